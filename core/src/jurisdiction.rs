//! Jurisdiction normalizer — two-letter codes to full names.
//!
//! The table is fixed: the 50 states, the District of Columbia and
//! Puerto Rico. A code outside it has no full name; callers treat that
//! absence as "unknown jurisdiction", never as an error.

/// (code, full name), ordered by code within the states, DC and PR last.
pub const JURISDICTIONS: [(&str, &str); 52] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("DC", "District of Columbia"),
    ("PR", "Puerto Rico"),
];

/// Full name for a two-letter code. Exact match only: `"ca"` and
/// `" CA "` are unknown.
pub fn full_name(code: &str) -> Option<&'static str> {
    JURISDICTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Reverse lookup: the code for an exact full name.
pub fn code_for(name: &str) -> Option<&'static str> {
    let name = name.trim();
    JURISDICTIONS
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn covers_states_dc_and_puerto_rico() {
        let codes: HashSet<_> = JURISDICTIONS.iter().map(|(c, _)| *c).collect();
        assert_eq!(codes.len(), JURISDICTIONS.len(), "codes must be unique");
        assert_eq!(full_name("DC"), Some("District of Columbia"));
        assert_eq!(full_name("PR"), Some("Puerto Rico"));
        assert_eq!(full_name("CA"), Some("California"));
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(full_name("TX"), Some("Texas"));
        assert_eq!(full_name("ca"), None);
        assert_eq!(full_name(" CA "), None);
        assert_eq!(full_name("Ny"), None);
    }

    #[test]
    fn unknown_codes_have_no_name() {
        assert_eq!(full_name("ZZ"), None);
        assert_eq!(full_name(""), None);
        assert_eq!(full_name("CAL"), None);
        // Territories outside the table are unknown too.
        assert_eq!(full_name("GU"), None);
    }

    #[test]
    fn reverse_lookup_matches_forward() {
        for (code, name) in JURISDICTIONS {
            assert_eq!(code_for(name), Some(code));
        }
        assert_eq!(code_for("Atlantis"), None);
    }
}
