use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const HOME_KEY: &str = "home";
const DEFAULT_HOME_LABEL: &str = "home";

/// Categories every site shows even when the data file omits them.
const DEFAULT_CATEGORIES: [&str; 5] = ["about", "booking", "collabs", "training", "blog"];

/// A named cell to place. Exactly one per run is home.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub key: String,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub is_home: bool,
}

impl Section {
    pub fn home(label: &str) -> Self {
        Self {
            key: HOME_KEY.to_string(),
            label: label.to_string(),
            url: "index.html".to_string(),
            is_home: true,
        }
    }

    pub fn destination(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            url: format!("{key}.html"),
            is_home: false,
        }
    }
}

/// Home plus the default categories.
pub fn default_sections() -> Vec<Section> {
    sections_from_data(&Value::Null)
}

fn trimmed_str(v: Option<&Value>) -> Option<&str> {
    v.and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

/// Ordered `(key, label)` categories: declared ones first, then missing
/// defaults, then any other array-valued keys of the data file.
fn normalize_categories(raw: Option<&Value>, data_keys: &[&str]) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = raw
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|c| {
                    let key = trimmed_str(c.get("key"))?;
                    let label = trimmed_str(c.get("label")).unwrap_or(key);
                    Some((key.to_string(), label.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut seen: HashSet<String> = out.iter().map(|(k, _)| k.clone()).collect();
    for key in DEFAULT_CATEGORIES.iter().chain(data_keys) {
        if seen.insert(key.to_string()) {
            out.push((key.to_string(), key.to_string()));
        }
    }
    out
}

/// Build the section list from a site data document.
///
/// Anything that is not an object is treated as an empty document, so a
/// missing or broken data file still yields home plus the defaults.
pub fn sections_from_data(data: &Value) -> Vec<Section> {
    let data_keys: Vec<&str> = data
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(k, v)| k.as_str() != "meta" && v.is_array())
                .map(|(k, _)| k.as_str())
                .collect()
        })
        .unwrap_or_default();

    let meta = data.get("meta");
    let home_label = trimmed_str(meta.and_then(|m| m.get("homeLabel"))).unwrap_or(DEFAULT_HOME_LABEL);

    let mut sections = vec![Section::home(home_label)];
    sections.extend(
        normalize_categories(meta.and_then(|m| m.get("categories")), &data_keys)
            .into_iter()
            .filter(|(key, _)| key != HOME_KEY)
            .map(|(key, label)| Section::destination(&key, &label)),
    );
    sections
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn keys(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn null_data_gives_home_and_defaults() {
        let s = default_sections();
        assert_eq!(keys(&s), vec!["home", "about", "booking", "collabs", "training", "blog"]);
        assert!(s[0].is_home);
        assert_eq!(s[0].url, "index.html");
        assert_eq!(s[3].url, "collabs.html");
        assert!(s[1..].iter().all(|x| !x.is_home));
    }

    #[test]
    fn declared_categories_come_first_and_labels_default_to_key() {
        let data = json!({
            "meta": {
                "homeLabel": "  start ",
                "categories": [
                    {"key": "blog", "label": "Journal"},
                    {"key": "  ", "label": "dropped"},
                    {"key": "press"},
                    {"key": "home", "label": "ignored"}
                ]
            }
        });
        let s = sections_from_data(&data);
        assert_eq!(s[0].label, "start");
        assert_eq!(
            keys(&s),
            vec!["home", "blog", "press", "about", "booking", "collabs", "training"]
        );
        assert_eq!(s[1].label, "Journal");
        assert_eq!(s[2].label, "press");
    }

    #[test]
    fn array_keys_of_data_become_sections() {
        let data = json!({
            "meta": {},
            "about": [],
            "workshops": [{"title": "x"}],
            "notes": "not an array"
        });
        let s = sections_from_data(&data);
        assert_eq!(keys(&s).last(), Some(&"workshops"));
        assert!(!keys(&s).contains(&"notes"));
        assert!(!keys(&s).contains(&"meta"));
        assert_eq!(keys(&s).iter().filter(|k| **k == "about").count(), 1);
    }

    #[test]
    fn extra_keys_keep_document_order() {
        let data: Value =
            serde_json::from_str(r#"{"zines": [], "archive": [], "meta": {}}"#).unwrap();
        let s = sections_from_data(&data);
        assert_eq!(keys(&s)[s.len() - 2..], ["zines", "archive"]);
    }
}
