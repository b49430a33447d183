// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for `!`-delimited `key:=value` description strings.
//!
//! ```text
//! modelBrandGoodCode:=Groove_A12!ZJ:=5!GD:=12!YSFX:=Z+
//! ```
//!
//! Segments without `:=` carry a key but no value. Keys and values are trimmed.

use nom::{
    bytes::complete::{tag, take_till, take_until},
    character::complete::char,
    combinator::rest,
    multi::separated_list0,
    sequence::separated_pair,
    IResult,
};
use smallvec::SmallVec;

use crate::info::keys;

const SEGMENT_DELIMITER: char = '!';
const ASSIGN: &str = ":=";

/// One `key:=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionField {
    pub key: String,
    pub value: Option<String>,
}

/// Parsed description with fields in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    fields: SmallVec<[DescriptionField; 8]>,
}

impl Description {
    /// Value of the last field named `key` (later segments override earlier ones).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|field| field.key == key)
            .and_then(|field| field.value.as_deref())
    }

    pub fn brand_good_code(&self) -> Option<&str> {
        self.get(keys::BRAND_GOOD_CODE)
    }

    pub fn fields(&self) -> &[DescriptionField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn segment(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == SEGMENT_DELIMITER)(input)
}

fn segments(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(char(SEGMENT_DELIMITER), segment)(input)
}

fn assignment(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_until(ASSIGN), tag(ASSIGN), rest)(input)
}

fn parse_field(raw: &str) -> Option<DescriptionField> {
    let field = match assignment(raw) {
        Ok((_, (key, value))) => {
            // A second `:=` ends the value.
            let value = value.split(ASSIGN).next().unwrap_or_default();
            DescriptionField {
                key: key.trim().to_owned(),
                value: Some(value.trim().to_owned()),
            }
        }
        Err(_) => DescriptionField {
            key: raw.trim().to_owned(),
            value: None,
        },
    };
    (!field.key.is_empty()).then_some(field)
}

/// Parses a description string. Never fails: malformed segments are kept as
/// value-less keys and empty segments are skipped.
pub fn parse_description(input: &str) -> Description {
    let raw_segments = match segments(input) {
        Ok((_, parsed)) => parsed,
        Err(_) => Vec::new(),
    };
    Description {
        fields: raw_segments.into_iter().filter_map(parse_field).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_in_order() {
        let desc = parse_description("modelBrandGoodCode:=Groove_A12!ZJ:=5!GD:=12!YSFX:=Z+");
        assert_eq!(desc.len(), 4);
        assert_eq!(desc.brand_good_code(), Some("Groove_A12"));
        assert_eq!(desc.get("ZJ"), Some("5"));
        assert_eq!(desc.get("YSFX"), Some("Z+"));
    }

    #[test]
    fn trims_keys_and_values() {
        let desc = parse_description("  KuName :=  Left side  ! GD:= 3 ");
        assert_eq!(desc.get("KuName"), Some("Left side"));
        assert_eq!(desc.get("GD"), Some("3"));
    }

    #[test]
    fn key_without_value() {
        let desc = parse_description("flag!a:=1");
        assert_eq!(desc.fields()[0].key, "flag");
        assert_eq!(desc.get("flag"), None);
        assert_eq!(desc.get("a"), Some("1"));
    }

    #[test]
    fn empty_segments_and_input() {
        assert!(parse_description("").is_empty());
        let desc = parse_description("!!a:=1!");
        assert_eq!(desc.len(), 1);
    }

    #[test]
    fn second_assign_truncates_value() {
        let desc = parse_description("a:=1:=2");
        assert_eq!(desc.get("a"), Some("1"));
    }

    #[test]
    fn later_segment_overrides() {
        let desc = parse_description("a:=1!a:=2");
        assert_eq!(desc.get("a"), Some("2"));
    }
}
