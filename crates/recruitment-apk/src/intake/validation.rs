use std::sync::OnceLock;

use regex::Regex;

use super::domain::SubmissionRequest;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Dutch numbers: optional +31/0031/0 prefix, then nine digits not
    // starting with zero.
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\+31|0031|0)?[1-9][0-9]{8}$").expect("valid phone regex")
    })
}

/// Strip the separators callers habitually type into phone fields.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

fn valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

fn valid_phone(phone: &str) -> bool {
    phone_pattern().is_match(&normalize_phone(phone))
}

/// Check the required fields and return every problem found, as the Dutch
/// messages the frontend displays verbatim. An empty list means the request
/// is acceptable.
pub fn validate(request: &SubmissionRequest) -> Vec<String> {
    let mut errors = Vec::new();

    let name_ok = request
        .name
        .as_deref()
        .map(|name| name.trim().chars().count() >= 2)
        .unwrap_or(false);
    if !name_ok {
        errors.push("Naam is verplicht (minimaal 2 karakters)".to_string());
    }

    let email_ok = request.email.as_deref().map(valid_email).unwrap_or(false);
    if !email_ok {
        errors.push("Geldig email adres is verplicht".to_string());
    }

    let phone_ok = request.phone.as_deref().map(valid_phone).unwrap_or(false);
    if !phone_ok {
        errors.push("Geldig telefoonnummer is verplicht".to_string());
    }

    let company_ok = request
        .company
        .as_deref()
        .map(|company| {
            let len = company.trim().chars().count();
            (2..=100).contains(&len)
        })
        .unwrap_or(false);
    if !company_ok {
        errors.push("Bedrijfsnaam is verplicht (2-100 karakters)".to_string());
    }

    let score_ok = request
        .assessment_score
        .map(|score| (0..=100).contains(&score))
        .unwrap_or(false);
    if !score_ok {
        errors.push("Ongeldige assessment score".to_string());
    }

    errors
}
