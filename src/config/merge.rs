//! Deep merge for YAML-sourced configuration values.
//!
//! Config files and inline fragments are folded onto the store through a
//! field-by-field merge: mappings merge recursively, everything else is
//! replaced wholesale by the higher-ranked value. A null overlay means
//! "not specified" and preserves the base value, which is how the
//! unset-never-overwrites invariant holds for file-based sources.
//!
//! List fields with extend semantics (ignore patterns, extra filename
//! cleaners) are handled by the loader before the value reaches this merge;
//! at this level arrays replace, never concatenate.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        // Null overlay means "not specified": keep the base value.
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_wins_key_by_key() {
        let base = json!({"template": "default", "make_data_dir": true});
        let overlay = json!({"template": "simple"});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"template": "simple", "make_data_dir": true})
        );
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let base = json!({"kwargs": {"a": 1, "b": 2}});
        let overlay = json!({"kwargs": {"b": 3}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"kwargs": {"a": 1, "b": 3}})
        );
    }

    #[test]
    fn arrays_replace_wholesale() {
        let base = json!({"run_modules": ["fastqc", "cutadapt"]});
        let overlay = json!({"run_modules": ["star"]});
        assert_eq!(deep_merge(base, overlay), json!({"run_modules": ["star"]}));
    }

    #[test]
    fn null_overlay_preserves_base() {
        let base = json!({"title": "My Report", "output_dir": "out"});
        let overlay = json!({"title": null});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"title": "My Report", "output_dir": "out"})
        );
    }

    #[test]
    fn scalar_replaced_by_mapping() {
        let base = json!({"use_filename_as_sample_name": false});
        let overlay = json!({"use_filename_as_sample_name": ["*.log"]});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"use_filename_as_sample_name": ["*.log"]})
        );
    }
}
