use crate::Label;
use anyhow::Result;
use bbox::{Rect, XYWH};
use serde::{Deserialize, Deserializer, Serialize};

/// The annotations of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// The image identifier. The image file is named after it.
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub gtboxes: Vec<GtBox>,
}

/// A ground truth box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtBox {
    pub tag: String,
    /// The visible region in `[x, y, w, h]` absolute pixels.
    pub vbox: [f64; 4],
    #[serde(default)]
    pub extra: BoxExtra,
}

impl GtBox {
    pub fn is_ignored(&self) -> bool {
        self.extra.ignore
    }

    pub fn visible_box(&self) -> Result<XYWH<f64>> {
        XYWH::try_from_xywh(self.vbox)
    }

    pub fn to_label(&self) -> Result<Label<XYWH<f64>, String>> {
        Ok(Label {
            rect: self.visible_box()?,
            class: self.tag.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxExtra {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub ignore: bool,
}

/// Accept `null`, booleans, numbers and strings, and treat any non-empty
/// or non-zero value as set.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    let flag = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(num)) => num.as_f64().map(|val| val != 0.0).unwrap_or(true),
        Some(Value::String(text)) => !text.is_empty(),
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expect a boolean, a number or a string, but found {}",
                other
            )))
        }
    };
    Ok(flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::RectNum;

    #[test]
    fn parse_ignore_flag_variants() {
        let parse = |extra: &str| -> bool {
            let text = format!(r#"{{"tag": "person", "vbox": [1, 2, 3, 4], "extra": {}}}"#, extra);
            serde_json::from_str::<GtBox>(&text).unwrap().is_ignored()
        };

        assert!(!parse("{}"));
        assert!(!parse(r#"{"ignore": null}"#));
        assert!(!parse(r#"{"ignore": 0}"#));
        assert!(!parse(r#"{"ignore": false}"#));
        assert!(parse(r#"{"ignore": 1}"#));
        assert!(parse(r#"{"ignore": true}"#));
        assert!(parse(r#"{"box_id": 3, "occ": 1, "ignore": 1}"#));
    }

    #[test]
    fn reject_nested_ignore_flag() {
        let text = r#"{"tag": "person", "vbox": [1, 2, 3, 4], "extra": {"ignore": [1]}}"#;
        let err = serde_json::from_str::<GtBox>(text).unwrap_err();
        assert!(err
            .to_string()
            .contains("expect a boolean, a number or a string"));
    }

    #[test]
    fn missing_extra_is_not_ignored() {
        let text = r#"{"tag": "person", "vbox": [1, 2, 3, 4]}"#;
        let gtbox: GtBox = serde_json::from_str(text).unwrap();
        assert!(!gtbox.is_ignored());
    }

    #[test]
    fn parse_record_with_crowd_fields() {
        let text = r#"{"ID": "273271,c9db000d5146c15", "gtboxes": [
            {"tag": "person", "hbox": [1, 2, 3, 4], "fbox": [0, 0, 10, 10], "vbox": [0, 0, 10, 10]},
            {"tag": "mask", "vbox": [5, 5, 10, 10], "extra": {"ignore": "yes"}}
        ]}"#;
        let record: AnnotationRecord = serde_json::from_str(text).unwrap();

        assert_eq!(record.id, "273271,c9db000d5146c15");
        assert_eq!(record.gtboxes.len(), 2);
        assert!(!record.gtboxes[0].is_ignored());
        assert!(record.gtboxes[1].is_ignored());

        let label = record.gtboxes[0].to_label().unwrap();
        assert_eq!(label.class, "person");
        assert_eq!(label.rect.xywh(), [0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn missing_gtboxes_is_empty() {
        let record: AnnotationRecord = serde_json::from_str(r#"{"ID": "a"}"#).unwrap();
        assert!(record.gtboxes.is_empty());
    }

    #[test]
    fn visible_box_rejects_negative_size() {
        let gtbox = GtBox {
            tag: "person".into(),
            vbox: [3.0, 4.0, -1.0, 2.0],
            extra: BoxExtra::default(),
        };
        assert!(gtbox.visible_box().is_err());
        assert!(gtbox.to_label().is_err());
    }
}
