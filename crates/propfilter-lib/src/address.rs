//! Address concatenation.

use crate::property::Address;

/// Concatenate an address into a single line.
///
/// Building number, street, suburb, state and postcode are always joined by
/// single spaces, with absent fields contributing an empty string. Interior
/// gaps are therefore kept: an address without a street yields two adjacent
/// spaces. The unit number is only prefixed (followed by one space) when it is
/// present, so addresses without one never start with a blank.
pub fn concat_address(address: &Address) -> String {
    let line = [
        present(&address.building_number),
        present(&address.street),
        present(&address.suburb),
        present(&address.state),
        present(&address.postcode),
    ]
    .map(|field| field.unwrap_or(""))
    .join(" ");

    match present(&address.unit_number) {
        Some(unit) => format!("{unit} {line}"),
        None => line,
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
