// src/matching/email.rs

/// Normalize an email address into an identity key.
///
/// Lowercases, strips `+tag` aliasing from the local part, folds
/// `googlemail.com` onto `gmail.com`, and removes dots in gmail local parts
/// (gmail ignores them). Anything that does not look like `local@domain`
/// normalizes to the empty string and is ineligible as a key.
pub fn normalize_email(email: &str) -> String {
    let email_trimmed = email.trim().to_lowercase();
    if !email_trimmed.contains('@') {
        return String::new();
    }

    let parts: Vec<&str> = email_trimmed.splitn(2, '@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return String::new();
    }

    let (local_part_full, domain_part) = (parts[0], parts[1]);

    // Remove part after '+' (email aliasing)
    let local_part_no_plus = local_part_full.split('+').next().unwrap_or("").to_string();

    let final_domain_part = match domain_part {
        "googlemail.com" => "gmail.com",
        other => other,
    };

    let final_local_part = if final_domain_part == "gmail.com" {
        local_part_no_plus.replace('.', "")
    } else {
        local_part_no_plus
    };

    if final_local_part.is_empty() {
        return String::new();
    }

    format!("{}@{}", final_local_part, final_domain_part)
}
