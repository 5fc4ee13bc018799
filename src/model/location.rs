use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A 1-based line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    /// Build a position from raw analyzer numbers.
    ///
    /// Analyzers use 0 or -1 for "unknown"; anything below 1 clamps to 1.
    pub fn new(line: i64, column: i64) -> Self {
        SourcePosition {
            line: clamp_one_based(line),
            column: clamp_one_based(column),
        }
    }
}

fn clamp_one_based(value: i64) -> u32 {
    value.clamp(1, u32::MAX as i64) as u32
}

/// A source span. Single-point regions have no end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRegion {
    pub start: SourcePosition,
    pub end: Option<SourcePosition>,
}

impl SourceRegion {
    pub fn point(position: SourcePosition) -> Self {
        SourceRegion {
            start: position,
            end: None,
        }
    }

    /// Collapse several (start, end) ranges into one covering region.
    ///
    /// Start and end bounds are tracked independently: the start is the
    /// smallest start (line first, then column) and the end is the largest
    /// end. Disjoint ranges therefore produce a region that also covers the
    /// gap between them. Returns `None` for an empty slice.
    pub fn reconcile(ranges: &[(SourcePosition, SourcePosition)]) -> Option<Self> {
        let (first_start, first_end) = *ranges.first()?;
        let mut start = first_start;
        let mut end = first_end;

        for &(range_start, range_end) in &ranges[1..] {
            if (range_start.line, range_start.column) < (start.line, start.column) {
                start = range_start;
            }
            if (range_end.line, range_end.column) > (end.line, end.column) {
                end = range_end;
            }
        }

        Some(SourceRegion {
            start,
            end: Some(end),
        })
    }

    /// Serializable view of this region with an optional inline message.
    pub fn with_message<'a>(&'a self, message: Option<&'a str>) -> RegionView<'a> {
        RegionView {
            region: self,
            message,
        }
    }
}

impl Serialize for SourceRegion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.with_message(None).serialize(serializer)
    }
}

/// Output shape of a region: flat start/end fields plus `message.text`.
pub struct RegionView<'a> {
    region: &'a SourceRegion,
    message: Option<&'a str>,
}

#[derive(Serialize)]
struct MessageText<'a> {
    text: &'a str,
}

impl Serialize for RegionView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("startLine", &self.region.start.line)?;
        map.serialize_entry("startColumn", &self.region.start.column)?;
        if let Some(end) = self.region.end {
            map.serialize_entry("endLine", &end.line)?;
            map.serialize_entry("endColumn", &end.column)?;
        }
        if let Some(text) = self.message {
            map.serialize_entry("message", &MessageText { text })?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: i64, column: i64) -> SourcePosition {
        SourcePosition::new(line, column)
    }

    #[test]
    fn test_reconcile_is_bounding_box() {
        let ranges = [(pos(2, 5), pos(2, 10)), (pos(1, 1), pos(3, 2))];
        let region = SourceRegion::reconcile(&ranges).unwrap();
        assert_eq!(region.start, pos(1, 1));
        assert_eq!(region.end, Some(pos(3, 2)));

        let reversed = [ranges[1], ranges[0]];
        assert_eq!(SourceRegion::reconcile(&reversed).unwrap(), region);
    }

    #[test]
    fn test_reconcile_breaks_line_ties_on_column() {
        let ranges = [(pos(4, 9), pos(6, 3)), (pos(4, 2), pos(6, 12))];
        let region = SourceRegion::reconcile(&ranges).unwrap();
        assert_eq!(region.start, pos(4, 2));
        assert_eq!(region.end, Some(pos(6, 12)));
    }

    #[test]
    fn test_reconcile_covers_gap_between_disjoint_ranges() {
        let ranges = [(pos(1, 1), pos(1, 4)), (pos(10, 1), pos(10, 4))];
        let region = SourceRegion::reconcile(&ranges).unwrap();
        assert_eq!(region.start, pos(1, 1));
        assert_eq!(region.end, Some(pos(10, 4)));
    }

    #[test]
    fn test_reconcile_empty_is_none() {
        assert!(SourceRegion::reconcile(&[]).is_none());
    }

    #[test]
    fn test_unknown_column_clamps_to_one() {
        assert_eq!(pos(12, -1), SourcePosition { line: 12, column: 1 });
    }

    #[test]
    fn test_region_json_shape() {
        let point = SourceRegion::point(pos(3, 7));
        let json = serde_json::to_value(point.with_message(Some("here"))).unwrap();
        assert_eq!(json["startLine"], 3);
        assert_eq!(json["startColumn"], 7);
        assert!(json.get("endLine").is_none());
        assert_eq!(json["message"]["text"], "here");

        let spanned = SourceRegion::reconcile(&[(pos(1, 2), pos(3, 4))]).unwrap();
        let json = serde_json::to_value(spanned).unwrap();
        assert_eq!(json["endLine"], 3);
        assert_eq!(json["endColumn"], 4);
        assert!(json.get("message").is_none());
    }
}
