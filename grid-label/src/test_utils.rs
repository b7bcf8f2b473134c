use crate::common::*;
use label::BoxExtra;

/// Build a record from `(tag, vbox, ignore)` triples.
pub fn record_from_boxes<I>(id: &str, boxes: I) -> Result<AnnotationRecord>
where
    I: IntoIterator<Item = (&'static str, [f64; 4], bool)>,
{
    ensure!(!id.is_empty(), "record identifier must not be empty");

    let gtboxes = boxes
        .into_iter()
        .map(|(tag, vbox, ignore)| GtBox {
            tag: tag.to_string(),
            vbox,
            extra: BoxExtra { ignore },
        })
        .collect();

    Ok(AnnotationRecord {
        id: id.to_string(),
        gtboxes,
    })
}
