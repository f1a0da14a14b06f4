use shelf_types::CatalogEntry;

use crate::error::{CatalogError, CatalogResult};
use crate::region::ArrayRegion;
use crate::render::render_entry;
use crate::scan::last_significant_end;

/// Append `entry` to the array at `region`, returning the new module text.
///
/// Only the region's bytes change. When the array already has elements, a
/// comma (unless one is already there) and a newline follow the last element,
/// then the rendered entry; whatever trailed the last element (comments,
/// whitespace before `]`) keeps its place around the new entry. A blank
/// region is replaced by the entry alone.
///
/// Not idempotent: inserting the same entry twice appends it twice.
pub fn insert_entry(raw: &str, region: &ArrayRegion, entry: &CatalogEntry) -> CatalogResult<String> {
    check_region(raw, region)?;
    let rendered = render_entry(entry)?;
    let (start, end) = (region.start, region.end);

    let mut out = String::with_capacity(raw.len() + rendered.len() + 2);
    out.push_str(&raw[..start]);

    match last_significant_end(raw, start, end) {
        Some(last) => {
            out.push_str(&raw[start..last]);
            if !raw[..last].ends_with(',') {
                out.push(',');
            }
            push_after(&mut out, &raw[last..end], &rendered);
        }
        None => {
            // Nothing but whitespace or comments.
            let inner = &raw[start..end];
            if inner.trim().is_empty() {
                out.push_str(&rendered);
            } else {
                push_after(&mut out, inner, &rendered);
            }
        }
    }

    out.push_str(&raw[end..]);
    Ok(out)
}

/// Push `tail`'s content, a newline, `rendered`, then `tail`'s trailing
/// whitespace.
fn push_after(out: &mut String, tail: &str, rendered: &str) {
    let body = tail.trim_end();
    out.push_str(body);
    out.push('\n');
    out.push_str(rendered);
    out.push_str(&tail[body.len()..]);
}

fn check_region(raw: &str, region: &ArrayRegion) -> CatalogResult<()> {
    let (start, end) = (region.start, region.end);
    let fits = start <= end
        && end < raw.len()
        && raw.is_char_boundary(start)
        && raw.is_char_boundary(end)
        && raw[..start].ends_with('[')
        && raw[end..].starts_with(']');
    if fits {
        Ok(())
    } else {
        Err(CatalogError::InvalidRegion { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::locate_array;
    use crate::render::render_entry;
    use proptest::prelude::*;

    fn sony() -> CatalogEntry {
        CatalogEntry::new("Sony-500", "A1", "/photos/Sony-500_A1.jpg")
    }

    fn patch(text: &str, variable: &str, entry: &CatalogEntry) -> String {
        let region = locate_array(text, variable).unwrap();
        insert_entry(text, &region, entry).unwrap()
    }

    fn entries(text: &str, variable: &str) -> Vec<CatalogEntry> {
        let region = locate_array(text, variable).unwrap();
        serde_json::from_str(&format!("[{}]", region.text(text))).unwrap()
    }

    #[test]
    fn appends_after_existing_entry() {
        let text = "const data = [\n{\n      \"name\": \"Samsung-100\",\n      \"shelfNumber\": \"B2\",\n      \"image\": \"/photos/Samsung-100_B2.jpg\"\n}];\nexport default data;\n";
        let patched = patch(text, "data", &sony());

        let expected = format!(
            "const data = [\n{{\n      \"name\": \"Samsung-100\",\n      \"shelfNumber\": \"B2\",\n      \"image\": \"/photos/Samsung-100_B2.jpg\"\n}},\n{}];\nexport default data;\n",
            render_entry(&sony()).unwrap()
        );
        assert_eq!(patched, expected);

        let list = entries(&patched, "data");
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], sony());
    }

    #[test]
    fn empty_region_gets_sole_entry() {
        let text = "const acData = [];";
        let patched = patch(text, "acData", &sony());
        let region = locate_array(&patched, "acData").unwrap();
        assert_eq!(region.text(&patched), render_entry(&sony()).unwrap());
        assert!(!region.text(&patched).starts_with(','));
        assert_eq!(entries(&patched, "acData"), vec![sony()]);
    }

    #[test]
    fn whitespace_region_is_replaced() {
        let text = "const data = [\n  \n];";
        let patched = patch(text, "data", &sony());
        assert_eq!(patched, format!("const data = [{}];", render_entry(&sony()).unwrap()));
    }

    #[test]
    fn closing_bracket_on_own_line_keeps_its_line() {
        let text = "const data = [\n  {\"name\": \"a\", \"shelfNumber\": \"1\", \"image\": \"/a\"}\n];";
        let patched = patch(text, "data", &sony());
        assert!(patched.ends_with("}\n];"));
        assert!(patched.contains("\"/a\"},\n{"));
        assert_eq!(entries(&patched, "data").len(), 2);
    }

    #[test]
    fn trailing_comma_is_not_doubled() {
        let text = "const data = [\n  {\"name\": \"a\", \"shelfNumber\": \"1\", \"image\": \"/a\"},\n];";
        let patched = patch(text, "data", &sony());
        assert!(!patched.contains(",,"));
        assert!(patched.contains("\"/a\"},\n{"));
    }

    #[test]
    fn trailing_comment_stays_put() {
        let text = "const data = [\n  {\"name\": \"a\", \"shelfNumber\": \"1\", \"image\": \"/a\"} // first\n];";
        let patched = patch(text, "data", &sony());
        assert!(patched.contains("\"/a\"}, // first\n{"));
        assert!(patched.ends_with("}\n];"));
    }

    #[test]
    fn comment_only_region_keeps_comment() {
        let text = "const data = [\n  // filled by the uploader\n];";
        let patched = patch(text, "data", &sony());
        assert!(patched.starts_with("const data = [\n  // filled by the uploader\n{"));
        assert!(!patched.contains(",\n{"));
    }

    #[test]
    fn inserting_twice_appends_twice() {
        let text = "const data = [];";
        let once = patch(text, "data", &sony());
        let twice = patch(&once, "data", &sony());
        assert_eq!(entries(&twice, "data"), vec![sony(), sony()]);
    }

    #[test]
    fn region_from_other_text_is_rejected() {
        let region = locate_array("// header\nconst data = [];", "data").unwrap();
        let err = insert_entry("const data = [];", &region, &sony()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRegion { .. }));
    }

    fn entry_literal(name: &str) -> String {
        render_entry(&CatalogEntry::new(name, "S1", "/photos/x.jpg")).unwrap()
    }

    proptest! {
        #[test]
        fn bytes_outside_region_are_preserved(
            prefix in "[a-z ;=(){}\n]{0,40}",
            suffix in "[a-z ;=(){}\n]{0,40}",
            names in proptest::collection::vec("[A-Za-z0-9 \\[\\]'\"]{0,12}", 0..4),
            pad in "[ \n]{0,3}",
            new_name in "[A-Za-z0-9 \\[\\]]{1,12}",
        ) {
            let inner: Vec<String> = names.iter().map(|n| entry_literal(n)).collect();
            let text = format!("{prefix}\nconst data = [{pad}{}{pad}];{suffix}", inner.join(",\n"));

            let before = locate_array(&text, "data").unwrap();
            let patched = insert_entry(&text, &before, &CatalogEntry::new(new_name.clone(), "Z9", "/p.jpg")).unwrap();
            let after = locate_array(&patched, "data").unwrap();

            prop_assert_eq!(after.start, before.start);
            prop_assert_eq!(&patched[..after.start], &text[..before.start]);
            prop_assert_eq!(&patched[after.end..], &text[before.end..]);

            let list: Vec<CatalogEntry> = serde_json::from_str(&format!("[{}]", after.text(&patched))).unwrap();
            prop_assert_eq!(list.len(), names.len() + 1);
            prop_assert_eq!(list.last().unwrap().name(), new_name.as_str());
        }
    }
}
