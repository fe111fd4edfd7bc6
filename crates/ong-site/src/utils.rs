//! Input masks for Brazilian phone numbers and CPFs
//!
//! Both masks are progressive: partial input gets the separators it has
//! digits for.

use std::sync::LazyLock;

use regex::Regex;

static AREA_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2})([0-9])").expect("AREA_CODE: invalid regex pattern"));
static PHONE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{5})([0-9])").expect("PHONE_DASH: invalid regex pattern"));
static PHONE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-[0-9]{4})[0-9]+?$").expect("PHONE_TAIL: invalid regex pattern"));
static CPF_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{3})([0-9])").expect("CPF_GROUP: invalid regex pattern"));
static CPF_CHECK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{3})([0-9]{1,2})$").expect("CPF_CHECK: invalid regex pattern")
});

/// Strip non-digits
fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// `11987654321` -> `(11) 98765-4321`
pub fn format_phone(phone: &str) -> String {
    let masked = AREA_CODE.replace(&digits(phone), "(${1}) ${2}").into_owned();
    let masked = PHONE_DASH.replace(&masked, "${1}-${2}").into_owned();
    PHONE_TAIL.replace(&masked, "${1}").into_owned()
}

/// `12345678901` -> `123.456.789-01`
pub fn format_cpf(cpf: &str) -> String {
    let masked = CPF_GROUP.replace(&digits(cpf), "${1}.${2}").into_owned();
    let masked = CPF_GROUP.replace(&masked, "${1}.${2}").into_owned();
    CPF_CHECK.replace(&masked, "${1}-${2}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("(11) 98765 4321"), "(11) 98765-4321");
    }

    #[test]
    fn test_format_phone_partial_and_overflow() {
        assert_eq!(format_phone("1198765"), "(11) 98765");
        assert_eq!(format_phone("119876543210"), "(11) 98765-4321");
        assert_eq!(format_phone("1"), "1");
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("12345678901"), "123.456.789-01");
        assert_eq!(format_cpf("123.456.789-01"), "123.456.789-01");
    }

    #[test]
    fn test_format_cpf_partial() {
        assert_eq!(format_cpf("1234"), "123.4");
        assert_eq!(format_cpf("1234567"), "123.456.7");
    }
}
