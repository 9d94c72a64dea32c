//! Minimal JSONPath support for JSON-bound slots.
//!
//! Supported syntax: `$`, `.key`, `['key']` / `["key"]` and `[index]`.
//! A path without a leading `$` is read relative to the document root.

use serde_json::Value as Json;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member
    Key(String),
    /// Array element
    Index(usize),
}

/// Parse a path expression into segments.
pub fn parse(path: &str) -> Result<Vec<Segment>, String> {
    let path = path.trim();
    let rest = match path.strip_prefix('$') {
        Some(rest) => rest,
        None if path.starts_with('[') => path,
        None => return parse(&format!("$.{}", path)),
    };

    let chars: Vec<char> = rest.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '.' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end] != '.' && chars[end] != '[' {
                    end += 1;
                }
                if end == start {
                    return Err(format!("empty member name at offset {}", i));
                }
                segments.push(Segment::Key(chars[start..end].iter().collect()));
                i = end;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|p| p + i)
                    .ok_or_else(|| format!("unclosed '[' at offset {}", i))?;
                let inner: String = chars[i + 1..close].iter().collect();
                let inner = inner.trim();
                let quoted = (inner.starts_with('\'') && inner.ends_with('\''))
                    || (inner.starts_with('"') && inner.ends_with('"'));
                if quoted && inner.len() >= 2 {
                    segments.push(Segment::Key(inner[1..inner.len() - 1].to_string()));
                } else {
                    let index = inner
                        .parse::<usize>()
                        .map_err(|_| format!("unsupported selector '[{}]'", inner))?;
                    segments.push(Segment::Index(index));
                }
                i = close + 1;
            }
            other => return Err(format!("unexpected character '{}' at offset {}", other, i)),
        }
    }

    Ok(segments)
}

/// Select the sub-value addressed by `segments`.
pub fn select<'a>(document: &'a Json, segments: &[Segment]) -> Option<&'a Json> {
    segments.iter().try_fold(document, |current, segment| match segment {
        Segment::Key(key) => current.as_object()?.get(key),
        Segment::Index(index) => current.as_array()?.get(*index),
    })
}

/// Write `value` at the location addressed by `segments`, creating
/// intermediate objects as needed.
///
/// Array elements can be replaced but not created.
pub fn insert(document: &mut Json, segments: &[Segment], value: Json) -> Result<(), String> {
    let Some((last, parents)) = segments.split_last() else {
        *document = value;
        return Ok(());
    };

    let mut current = document;
    for segment in parents {
        current = match segment {
            Segment::Key(key) => object_mut(current, key)?
                .entry(key.clone())
                .or_insert_with(|| Json::Object(serde_json::Map::new())),
            Segment::Index(index) => current
                .as_array_mut()
                .and_then(|arr| arr.get_mut(*index))
                .ok_or_else(|| format!("no array element at [{}]", index))?,
        };
    }

    match last {
        Segment::Key(key) => {
            object_mut(current, key)?.insert(key.clone(), value);
        }
        Segment::Index(index) => {
            let slot = current
                .as_array_mut()
                .and_then(|arr| arr.get_mut(*index))
                .ok_or_else(|| format!("no array element at [{}]", index))?;
            *slot = value;
        }
    }
    Ok(())
}

fn object_mut<'a>(
    current: &'a mut Json,
    key: &str,
) -> Result<&'a mut serde_json::Map<String, Json>, String> {
    current
        .as_object_mut()
        .ok_or_else(|| format!("cannot add member '{}' to a non-object", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse() {
        assert_eq!(parse("$").unwrap(), vec![]);
        assert_eq!(
            parse("$.key2[1]").unwrap(),
            vec![Segment::Key("key2".to_string()), Segment::Index(1)]
        );
        assert_eq!(
            parse("$['a b'].c").unwrap(),
            vec![Segment::Key("a b".to_string()), Segment::Key("c".to_string())]
        );
        assert_eq!(parse("key1").unwrap(), vec![Segment::Key("key1".to_string())]);
        assert!(parse("$..").is_err());
        assert!(parse("$[*]").is_err());
        assert!(parse("$[0").is_err());
    }

    #[test]
    fn test_select() {
        let doc = json!({"key1": "value1", "key2": ["value2", "value3"]});
        let path = parse("$.key2").unwrap();
        assert_eq!(select(&doc, &path), Some(&json!(["value2", "value3"])));

        let path = parse("$.key2[1]").unwrap();
        assert_eq!(select(&doc, &path), Some(&json!("value3")));

        let path = parse("$.missing").unwrap();
        assert_eq!(select(&doc, &path), None);
    }

    #[test]
    fn test_insert_creates_objects() {
        let mut doc = json!({});
        insert(&mut doc, &parse("$.a.b").unwrap(), json!(1)).unwrap();
        assert_eq!(doc, json!({"a": {"b": 1}}));

        let mut doc = json!([1]);
        assert!(insert(&mut doc, &parse("$[3]").unwrap(), json!(2)).is_err());
    }
}
