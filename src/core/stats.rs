/// Combinatorics and profile reports. Informational only.

use num_bigint::BigUint;
use std::fmt::Write;

use crate::core::profile::VocabularyConfiguration;

/// Number of distinct prompts a profile can express: template count times
/// the size of every pool. Exact; rich profiles overflow 64 bits.
pub fn total_combinations(config: &VocabularyConfiguration) -> BigUint {
    let mut total = BigUint::from(config.templates().len());
    for (_, pool) in config.pools() {
        total *= pool.len();
    }
    total
}

/// `188274509660160` → `188,274,509,660,160`.
pub fn format_thousands(value: &BigUint) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Scientific notation with two decimals, e.g. `1.88e+14`.
///
/// Computed from the decimal digits, so values beyond `f64` range still
/// format. Ties round to even.
pub fn format_scientific(value: &BigUint) -> String {
    let digits: Vec<u8> = value.to_string().bytes().map(|b| b - b'0').collect();
    let mut exponent = digits.len() - 1;

    let digit = |i: usize| u32::from(digits.get(i).copied().unwrap_or(0));
    let mut mantissa = digit(0) * 100 + digit(1) * 10 + digit(2);

    let next = digit(3);
    let rest_nonzero = digits.iter().skip(4).any(|&d| d != 0);
    let round_up = next > 5 || (next == 5 && (rest_nonzero || mantissa % 2 == 1));
    if round_up {
        mantissa += 1;
        if mantissa == 1000 {
            mantissa = 100;
            exponent += 1;
        }
    }

    format!("{}.{:02}e+{:02}", mantissa / 100, mantissa % 100, exponent)
}

/// Multi-line human-readable summary of a profile.
pub fn profile_info(id: &str, config: &VocabularyConfiguration) -> String {
    let meta = config.metadata();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Profile: {}", meta.name.as_deref().unwrap_or(id));
    let _ = writeln!(out, "Description: {}", meta.description.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "Version: {}", meta.version.as_deref().unwrap_or("N/A"));
    out.push('\n');
    out.push_str("Pool Sizes:\n");
    for (slot, pool) in config.pools() {
        let _ = writeln!(out, "  {}: {} entries", slot, pool.len());
    }
    let _ = writeln!(out, "  templates: {} variations", config.templates().len());
    out.push('\n');

    let total = total_combinations(config);
    let _ = writeln!(out, "Total unique prompts: {}", format_thousands(&total));
    let _ = write!(out, "Scientific notation: {}", format_scientific(&total));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> VocabularyConfiguration {
        VocabularyConfiguration::parse_json(
            "small.json",
            r#"{
                "templates": ["{color} {animal}", "a {animal} that is {color}"],
                "pools": {
                    "color": ["red", "green", "blue"],
                    "animal": ["cat", "dog", "owl", "eel"]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn combinations_are_the_product() {
        assert_eq!(total_combinations(&small()), BigUint::from(24u32));
    }

    #[test]
    fn combinations_exceed_u64() {
        // 2 templates × 20 pools of 20 entries = 2 × 20^20 > u64::MAX.
        let mut pools = String::new();
        for i in 0..20 {
            if i > 0 {
                pools.push(',');
            }
            let items: Vec<String> = (0..20).map(|j| format!("\"w{j}\"")).collect();
            pools.push_str(&format!("\"s{i}\": [{}]", items.join(",")));
        }
        let json = format!(r#"{{"templates": ["{{s0}}", "{{s1}}"], "pools": {{{pools}}}}}"#);
        let config = VocabularyConfiguration::parse_json("wide.json", &json).unwrap();

        let total = total_combinations(&config);
        assert!(total > BigUint::from(u64::MAX));
        assert_eq!(total, BigUint::from(2u32) * BigUint::from(20u32).pow(20));
        assert_eq!(format_scientific(&total), "2.10e+26");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(&BigUint::from(0u32)), "0");
        assert_eq!(format_thousands(&BigUint::from(24u32)), "24");
        assert_eq!(format_thousands(&BigUint::from(1000u32)), "1,000");
        assert_eq!(format_thousands(&BigUint::from(123456u32)), "123,456");
        assert_eq!(
            format_thousands(&BigUint::from(188_274_509_660_160u64)),
            "188,274,509,660,160"
        );
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(format_scientific(&BigUint::from(0u32)), "0.00e+00");
        assert_eq!(format_scientific(&BigUint::from(24u32)), "2.40e+01");
        assert_eq!(format_scientific(&BigUint::from(999u32)), "9.99e+02");
        assert_eq!(format_scientific(&BigUint::from(123456u32)), "1.23e+05");
        assert_eq!(format_scientific(&BigUint::from(123500u32)), "1.24e+05");
        assert_eq!(format_scientific(&BigUint::from(124500u32)), "1.24e+05");
        assert_eq!(format_scientific(&BigUint::from(9995u32)), "1.00e+04");
        assert_eq!(
            format_scientific(&BigUint::from(188_274_509_660_160u64)),
            "1.88e+14"
        );
    }

    #[test]
    fn info_report_layout() {
        let report = profile_info("small.json", &small());
        let expected = "\
Profile: small.json
Description: N/A
Version: N/A

Pool Sizes:
  color: 3 entries
  animal: 4 entries
  templates: 2 variations

Total unique prompts: 24
Scientific notation: 2.40e+01";
        assert_eq!(report, expected);
    }
}
