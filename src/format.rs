//! Display formatting and input masks (pt-BR).
//!
//! Masks are progressive: they format whatever prefix of digits the user
//! has typed so far, so they can run on every keystroke of a text input.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Keep only ASCII digits
pub fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a monetary value as "R$ 1.234,56"
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    // Group the integer part with '.' every three digits
    let mut grouped = String::new();
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

/// Format an ISO date or date-time string as "dd/mm/aaaa".
/// Unparseable input is returned unchanged.
pub fn format_date(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.format("%d/%m/%Y").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return d.format("%d/%m/%Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d/%m/%Y").to_string();
    }
    value.to_string()
}

/// Format an ISO date-time string as "dd/mm/aaaa hh:mm".
pub fn format_datetime(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    value.to_string()
}

/// Format a complete CNPJ (14 digits) or CPF (11 digits).
/// Values with any other digit count are returned unchanged.
pub fn format_cnpj_cpf(value: &str) -> String {
    let d = digits(value);
    match d.len() {
        11 => format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        ),
        _ => value.to_string(),
    }
}

/// Apply the CPF or CNPJ mask progressively while the user types
pub fn apply_cnpj_cpf_mask(value: &str, tipo_documento: &str) -> String {
    let d = digits(value);
    if d.is_empty() {
        return String::new();
    }

    if tipo_documento == "CPF" {
        let d = &d[..d.len().min(11)];
        match d.len() {
            0..=3 => d.to_string(),
            4..=6 => format!("{}.{}", &d[0..3], &d[3..]),
            7..=9 => format!("{}.{}.{}", &d[0..3], &d[3..6], &d[6..]),
            _ => format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..]),
        }
    } else {
        let d = &d[..d.len().min(14)];
        match d.len() {
            0..=2 => d.to_string(),
            3..=5 => format!("{}.{}", &d[0..2], &d[2..]),
            6..=8 => format!("{}.{}.{}", &d[0..2], &d[2..5], &d[5..]),
            9..=12 => format!("{}.{}.{}/{}", &d[0..2], &d[2..5], &d[5..8], &d[8..]),
            _ => format!(
                "{}.{}.{}/{}-{}",
                &d[0..2],
                &d[2..5],
                &d[5..8],
                &d[8..12],
                &d[12..]
            ),
        }
    }
}

/// Maximum input length for a masked CPF/CNPJ field
pub fn max_len_cnpj_cpf(tipo_documento: &str) -> usize {
    if tipo_documento == "CPF" {
        14 // 11 digits + 3 mask characters (000.000.000-00)
    } else {
        18 // 14 digits + 4 mask characters (00.000.000/0000-00)
    }
}

/// Format a complete CEP (8 digits) as "00000-000"
pub fn format_cep(value: &str) -> String {
    let d = digits(value);
    if d.len() == 8 {
        format!("{}-{}", &d[0..5], &d[5..8])
    } else {
        value.to_string()
    }
}

/// Apply the CEP mask progressively
pub fn apply_cep_mask(value: &str) -> String {
    let d = digits(value);
    let d = &d[..d.len().min(8)];
    if d.len() <= 5 {
        d.to_string()
    } else {
        format!("{}-{}", &d[0..5], &d[5..])
    }
}

/// Format a complete landline (10 digits) or mobile (11 digits) number
pub fn format_telefone(value: &str) -> String {
    let d = digits(value);
    match d.len() {
        10 => format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..10]),
        11 => format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..11]),
        _ => value.to_string(),
    }
}

/// Apply the telefone mask progressively
pub fn apply_telefone_mask(value: &str) -> String {
    let d = digits(value);
    let d = &d[..d.len().min(11)];
    match d.len() {
        0 => String::new(),
        1..=2 => format!("({}", d),
        3..=6 => format!("({}) {}", &d[0..2], &d[2..]),
        7..=10 => format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..]),
        _ => format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..]),
    }
}

/// Strip characters that are invalid in file names (/, \, :, *, ?, ", <, >, |)
pub fn sanitize_filename(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(1234.56), "R$ 1.234,56");
        assert_eq!(format_currency(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_currency(-12.5), "-R$ 12,50");
        // Rounding to cents
        assert_eq!(format_currency(0.005), "R$ 0,01");
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date("2026-01-15"), "15/01/2026");
        assert_eq!(format_date("2026-01-15T10:30:00Z"), "15/01/2026");
        assert_eq!(format_datetime("2026-01-15T10:30:00Z"), "15/01/2026 10:30");
        assert_eq!(format_date("not a date"), "not a date");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_cnpj_cpf_complete() {
        assert_eq!(format_cnpj_cpf("12345678901"), "123.456.789-01");
        assert_eq!(format_cnpj_cpf("12345678000195"), "12.345.678/0001-95");
        assert_eq!(format_cnpj_cpf("123"), "123");
    }

    #[test]
    fn test_cpf_mask_progressive() {
        assert_eq!(apply_cnpj_cpf_mask("123", "CPF"), "123");
        assert_eq!(apply_cnpj_cpf_mask("123456", "CPF"), "123.456");
        assert_eq!(apply_cnpj_cpf_mask("123456789", "CPF"), "123.456.789");
        assert_eq!(apply_cnpj_cpf_mask("12345678901", "CPF"), "123.456.789-01");
        // Extra digits are ignored
        assert_eq!(apply_cnpj_cpf_mask("123456789012345", "CPF"), "123.456.789-01");
    }

    #[test]
    fn test_cnpj_mask_progressive() {
        assert_eq!(apply_cnpj_cpf_mask("12", "CNPJ"), "12");
        assert_eq!(apply_cnpj_cpf_mask("12345", "CNPJ"), "12.345");
        assert_eq!(apply_cnpj_cpf_mask("12345678", "CNPJ"), "12.345.678");
        assert_eq!(apply_cnpj_cpf_mask("123456780001", "CNPJ"), "12.345.678/0001");
        assert_eq!(
            apply_cnpj_cpf_mask("12345678000195", "CNPJ"),
            "12.345.678/0001-95"
        );
    }

    #[test]
    fn test_cep() {
        assert_eq!(format_cep("01310100"), "01310-100");
        assert_eq!(apply_cep_mask("013"), "013");
        assert_eq!(apply_cep_mask("013101"), "01310-1");
    }

    #[test]
    fn test_telefone() {
        assert_eq!(format_telefone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_telefone("11933334444"), "(11) 93333-4444");
        assert_eq!(apply_telefone_mask("1"), "(1");
        assert_eq!(apply_telefone_mask("119"), "(11) 9");
        assert_eq!(apply_telefone_mask("11933334"), "(11) 9333-34");
        assert_eq!(apply_telefone_mask("11933334444"), "(11) 93333-4444");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("ORC-12 / ACME: *?\"<>|"), "ORC-12  ACME");
        assert_eq!(sanitize_filename("  plain  "), "plain");
    }
}
