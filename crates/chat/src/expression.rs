use regex::Regex;
use snafu::{OptionExt, ResultExt};

use crate::error::{ChatResult, TagPatternSnafu, UnknownExpressionSnafu};

/// Grid columns of the emoji panel.
pub const NORMAL_COUNT_BY_ROW: usize = 7;

const TAG_PREFIX: &str = "$ne#";
const TAG_SUFFIX: &str = "^";
const TAG_PATTERN: &str = r"\$ne#\d+\^";

const NORMAL_GLYPHS: &[&str] = &[
    "😀", "😁", "😂", "🤣", "😃", "😄", "😅", "😆", "😉", "😊", "😋", "😎", "😍", "😘",
    "🥰", "😗", "🙂", "🤗", "🤩", "🤔", "🤨", "😐", "😑", "😶", "🙄", "😏", "😣", "😥",
    "😮", "🤐", "😯", "😪", "😫", "🥱", "😴", "😌", "😛", "😜", "😝", "🤤", "😒", "😓",
    "😔", "😕", "🙃", "🤑", "😲", "🙁", "😖", "😞", "😟", "😤", "😢", "😭", "👍", "👏",
];

/// Placeholder tag stored in message text for the `index`-th (1-based) normal emoji.
pub fn normal_tag(index: usize) -> String {
    format!("{TAG_PREFIX}{index}{TAG_SUFFIX}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub index: usize,
    pub tag: String,
    pub glyph: &'static str,
}

/// A run of message text, split around resolved expression tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Expression(&'a Expression),
}

#[derive(Debug, Clone)]
pub struct ExpressionCatalog {
    expressions: Vec<Expression>,
    pattern: Regex,
}

impl ExpressionCatalog {
    /// The built-in "normal" set, tagged `$ne#1^` upwards.
    pub fn normal() -> ChatResult<Self> {
        let pattern = Regex::new(TAG_PATTERN).context(TagPatternSnafu {
            stage: "compile-expression-pattern",
        })?;
        let expressions = NORMAL_GLYPHS
            .iter()
            .enumerate()
            .map(|(offset, glyph)| Expression {
                index: offset + 1,
                tag: normal_tag(offset + 1),
                glyph,
            })
            .collect();

        Ok(Self {
            expressions,
            pattern,
        })
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Grid rows of [`NORMAL_COUNT_BY_ROW`] cells; the last row may be short.
    pub fn rows(&self) -> impl Iterator<Item = &[Expression]> {
        self.expressions.chunks(NORMAL_COUNT_BY_ROW)
    }

    pub fn lookup(&self, tag: &str) -> ChatResult<&Expression> {
        tag.strip_prefix(TAG_PREFIX)
            .and_then(|rest| rest.strip_suffix(TAG_SUFFIX))
            .and_then(|index| index.parse::<usize>().ok())
            .and_then(|index| index.checked_sub(1))
            .and_then(|offset| self.expressions.get(offset))
            .context(UnknownExpressionSnafu {
                stage: "lookup-expression",
                tag: tag.to_string(),
            })
    }

    /// Splits `text` around known tags. Unknown tags stay inside the text runs.
    pub fn segments<'a>(&'a self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut text_start = 0;

        for found in self.pattern.find_iter(text) {
            let Ok(expression) = self.lookup(found.as_str()) else {
                tracing::trace!(tag = found.as_str(), "unknown expression tag left as text");
                continue;
            };
            if found.start() > text_start {
                segments.push(Segment::Text(&text[text_start..found.start()]));
            }
            segments.push(Segment::Expression(expression));
            text_start = found.end();
        }

        if text_start < text.len() {
            segments.push(Segment::Text(&text[text_start..]));
        }
        segments
    }

    /// Text with every known tag replaced by its glyph.
    pub fn render(&self, text: &str) -> String {
        self.segments(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => text,
                Segment::Expression(expression) => expression.glyph,
            })
            .collect()
    }

    /// Byte length of a known tag ending exactly at `end`, if any.
    pub(crate) fn tag_ending_at(&self, text: &str, end: usize) -> Option<usize> {
        let start = text.get(..end)?.rfind(TAG_PREFIX)?;
        let candidate = &text[start..end];
        self.lookup(candidate).ok().map(|_| candidate.len())
    }
}
