//! Static lookup data backing `source`-driven option lists

use dynform_core::EnumOption;

fn options(pairs: &[(&str, &str)]) -> Vec<EnumOption> {
    pairs
        .iter()
        .map(|(label, value)| EnumOption::new(*label, *value))
        .collect()
}

pub fn countries() -> Vec<EnumOption> {
    options(&[
        ("United Kingdom", "GB"),
        ("United States", "US"),
        ("Canada", "CA"),
        ("Australia", "AU"),
        ("Germany", "DE"),
        ("France", "FR"),
    ])
}

/// Cities for a country code; unknown codes yield no cities
pub fn cities(country: &str) -> Vec<EnumOption> {
    match country {
        "GB" => options(&[
            ("London", "london"),
            ("Manchester", "manchester"),
            ("Birmingham", "birmingham"),
            ("Edinburgh", "edinburgh"),
        ]),
        "US" => options(&[
            ("New York", "new_york"),
            ("Los Angeles", "los_angeles"),
            ("Chicago", "chicago"),
            ("Houston", "houston"),
        ]),
        "CA" => options(&[
            ("Toronto", "toronto"),
            ("Vancouver", "vancouver"),
            ("Montreal", "montreal"),
        ]),
        _ => Vec::new(),
    }
}

pub fn subcategories(parent: &str) -> Vec<EnumOption> {
    match parent {
        "electronics" => options(&[
            ("Laptops", "laptops"),
            ("Phones", "phones"),
            ("Tablets", "tablets"),
        ]),
        "clothing" => options(&[
            ("Men", "men"),
            ("Women", "women"),
            ("Children", "children"),
        ]),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        assert_eq!(countries().len(), 6);
        assert_eq!(cities("CA")[0].label, "Toronto");
        assert!(cities("FR").is_empty());
        assert_eq!(subcategories("clothing")[2].value, "children");
        assert!(subcategories("toys").is_empty());
    }
}
