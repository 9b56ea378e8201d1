//! Selector subset parser
//!
//! Parses the small slice of CSS selector syntax that page controllers need
//! to locate markup:
//!
//! - Type selectors: `section`, `img`, `*`
//! - ID and class selectors: `#nav-menu`, `.nav-link`
//! - Attribute selectors: `[data-src]`, `[href="#about"]`, `[href^="#"]`
//! - Descendant combinator: `.hero-buttons a`
//! - Selector lists: `.section-header, .project-card`
//!
//! Matching against a page lives in [`crate::page::Page`].

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    Finish, IResult,
};

use crate::error::{CoreError, Result};

/// Attribute comparison operator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr="value"]`
    Equals,
    /// `[attr^="value"]`
    Prefix,
    /// `[attr*="value"]`
    Contains,
}

impl AttrOp {
    /// Compare an attribute value against the selector operand
    pub fn matches(&self, actual: &str, expected: &str) -> bool {
        match self {
            AttrOp::Equals => actual == expected,
            AttrOp::Prefix => actual.starts_with(expected),
            AttrOp::Contains => actual.contains(expected),
        }
    }
}

/// A single simple selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorPart {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute {
        name: String,
        op: Option<(AttrOp, String)>,
    },
}

/// Simple selectors with no combinator between them, e.g. `a.nav-link[href]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundSelector {
    pub parts: Vec<SelectorPart>,
}

/// Compound selectors joined by descendant combinators.
///
/// The last compound is the subject; the earlier ones must match ancestors
/// in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
}

impl ComplexSelector {
    /// The compound that must match the element itself
    pub fn subject(&self) -> &CompoundSelector {
        // separated_list1/compound parsing guarantees at least one entry
        &self.compounds[self.compounds.len() - 1]
    }
}

/// Comma separated list of complex selectors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: String| CoreError::InvalidSelector {
            selector: input.to_string(),
            reason,
        };

        let (rest, selectors) = delimited(multispace0, selector_list, multispace0)(input)
            .finish()
            .map_err(|e| invalid(format!("unexpected input at `{}`", e.input)))?;

        if !rest.is_empty() {
            return Err(invalid(format!("trailing input `{rest}`")));
        }

        Ok(Self { selectors })
    }
}

impl std::str::FromStr for SelectorList {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn type_selector(input: &str) -> IResult<&str, SelectorPart> {
    alt((
        map(char('*'), |_| SelectorPart::Universal),
        map(identifier, |name: &str| {
            SelectorPart::Tag(name.to_ascii_lowercase())
        }),
    ))(input)
}

fn id_selector(input: &str) -> IResult<&str, SelectorPart> {
    map(preceded(char('#'), identifier), |id: &str| {
        SelectorPart::Id(id.to_string())
    })(input)
}

fn class_selector(input: &str) -> IResult<&str, SelectorPart> {
    map(preceded(char('.'), identifier), |class: &str| {
        SelectorPart::Class(class.to_string())
    })(input)
}

fn attr_op(input: &str) -> IResult<&str, AttrOp> {
    alt((
        map(tag("^="), |_| AttrOp::Prefix),
        map(tag("*="), |_| AttrOp::Contains),
        map(tag("="), |_| AttrOp::Equals),
    ))(input)
}

fn attr_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        identifier,
    ))(input)
}

/// `[name]`, `[name="v"]`, `[name^='v']`
fn attribute_selector(input: &str) -> IResult<&str, SelectorPart> {
    let (input, _) = char('[')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, op) = opt(tuple((attr_op, multispace0, attr_value, multispace0)))(input)?;
    let (input, _) = char(']')(input)?;

    Ok((
        input,
        SelectorPart::Attribute {
            name: name.to_string(),
            op: op.map(|(op, _, value, _)| (op, value.to_string())),
        },
    ))
}

fn compound_selector(input: &str) -> IResult<&str, CompoundSelector> {
    let (rest, (head, tail)) = pair(
        opt(type_selector),
        many0(alt((id_selector, class_selector, attribute_selector))),
    )(input)?;

    let mut parts = Vec::with_capacity(tail.len() + 1);
    parts.extend(head);
    parts.extend(tail);

    if parts.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Many1,
        )));
    }

    Ok((rest, CompoundSelector { parts }))
}

fn complex_selector(input: &str) -> IResult<&str, ComplexSelector> {
    let (rest, (first, others)) = pair(
        compound_selector,
        many0(preceded(multispace1, compound_selector)),
    )(input)?;

    let mut compounds = Vec::with_capacity(others.len() + 1);
    compounds.push(first);
    compounds.extend(others);

    Ok((rest, ComplexSelector { compounds }))
}

fn selector_list(input: &str) -> IResult<&str, Vec<ComplexSelector>> {
    separated_list1(
        delimited(multispace0, char(','), multispace0),
        complex_selector,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_parts() {
        let list = SelectorList::parse("#theme-toggle").unwrap();
        assert_eq!(list.selectors.len(), 1);
        assert_eq!(
            list.selectors[0].subject().parts,
            vec![SelectorPart::Id("theme-toggle".into())]
        );

        let list = SelectorList::parse("section[id]").unwrap();
        assert_eq!(
            list.selectors[0].subject().parts,
            vec![
                SelectorPart::Tag("section".into()),
                SelectorPart::Attribute {
                    name: "id".into(),
                    op: None
                },
            ]
        );
    }

    #[test]
    fn test_parse_attribute_operators() {
        let list = SelectorList::parse(r##".nav-link[href="#about"]"##).unwrap();
        assert_eq!(
            list.selectors[0].subject().parts[1],
            SelectorPart::Attribute {
                name: "href".into(),
                op: Some((AttrOp::Equals, "#about".into())),
            }
        );

        let list = SelectorList::parse(r##"a[href^='#']"##).unwrap();
        assert_eq!(
            list.selectors[0].subject().parts[1],
            SelectorPart::Attribute {
                name: "href".into(),
                op: Some((AttrOp::Prefix, "#".into())),
            }
        );
    }

    #[test]
    fn test_parse_descendant_and_list() {
        let list =
            SelectorList::parse(r##" .hero-buttons a[href^="#"] , .section-header "##).unwrap();
        assert_eq!(list.selectors.len(), 2);
        assert_eq!(list.selectors[0].compounds.len(), 2);
        assert_eq!(
            list.selectors[0].compounds[0].parts,
            vec![SelectorPart::Class("hero-buttons".into())]
        );
        assert_eq!(list.selectors[1].compounds.len(), 1);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(SelectorList::parse("").is_err());
        assert!(SelectorList::parse("#").is_err());
        assert!(SelectorList::parse(".a >").is_err());
        assert!(SelectorList::parse("[href").is_err());
    }

    #[test]
    fn test_attr_op_matching() {
        assert!(AttrOp::Prefix.matches("#contact", "#"));
        assert!(!AttrOp::Prefix.matches("https://x", "#"));
        assert!(AttrOp::Contains.matches("skill-progress", "progress"));
        assert!(AttrOp::Equals.matches("web", "web"));
    }
}
