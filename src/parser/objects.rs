//! Small helpers over the lopdf object model.

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

/// Page tree attributes are inherited at most this many levels up.
const MAX_INHERIT_DEPTH: usize = 32;

/// Follow a reference, if the object is one.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Resolve an object to a dictionary, direct or referenced.
pub(crate) fn as_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(d) => Some(d),
        Object::Stream(s) => Some(&s.dict),
        _ => None,
    }
}

/// Resolve an object to an array, direct or referenced.
pub(crate) fn as_array<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Vec<Object>> {
    match resolve(doc, obj)? {
        Object::Array(a) => Some(a),
        _ => None,
    }
}

/// Look up `key` in a dictionary and resolve it.
pub(crate) fn dict_get<'a>(
    doc: &'a LopdfDocument,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    resolve(doc, dict.get(key).ok()?)
}

/// Extract a number from an integer or real object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Read a page attribute, walking up `/Parent` links for inherited values.
pub(crate) fn inherited<'a>(
    doc: &'a LopdfDocument,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Some(value) = dict_get(doc, node, key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Read a rectangle array (`[x0 y0 x1 y1]`).
pub(crate) fn get_rect(doc: &LopdfDocument, obj: &Object) -> Option<[f32; 4]> {
    let arr = as_array(doc, obj)?;
    if arr.len() < 4 {
        return None;
    }
    let mut out = [0.0; 4];
    for (slot, item) in out.iter_mut().zip(arr) {
        *slot = get_number(resolve(doc, item)?)?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_get_number() {
        assert_eq!(get_number(&Object::Integer(12)), Some(12.0));
        assert_eq!(get_number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(get_number(&Object::Null), None);
    }

    #[test]
    fn test_inherited_media_box() {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let media_box = inherited(&doc, page_id, b"MediaBox").unwrap();
        assert_eq!(get_rect(&doc, media_box), Some([0.0, 0.0, 595.0, 842.0]));
        assert!(inherited(&doc, page_id, b"Resources").is_none());
    }
}
