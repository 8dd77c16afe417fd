//! Plausible, harmless content for the decoy vault.

use super::item::Item;

/// Name of the item every freshly initialized decoy vault starts with.
pub const WELCOME_NAME: &str = "decoy_welcome.txt";

const WELCOME_TEXT: &str = "Welcome to the decoy vault. Nothing secret here.\n";

/// The fixed contents sealed into a new decoy vault.
pub fn welcome_items() -> Vec<Item> {
    vec![Item::file(WELCOME_NAME, WELCOME_TEXT.as_bytes())]
}

/// A fuller set of everyday-looking files for `decoy-init`.
pub fn generate_items() -> Vec<Item> {
    let mut items: Vec<Item> = (1..=3u32)
        .map(|i| {
            let body = format!(
                "Invoice #{i}\nCompany: ACME Pvt Ltd\nAmount: INR {}\nNote: Paid\n",
                1000 * i
            );
            Item::file(format!("invoice_{i}.txt"), body.into_bytes())
        })
        .collect();

    items.push(Item::file(
        "notes.txt",
        "Grocery list:\n- milk\n- eggs\n- rice\n".as_bytes(),
    ));
    items.push(Item::file(
        "welcome.txt",
        "Welcome! This is a harmless decoy folder.\n".as_bytes(),
    ));
    items
}
