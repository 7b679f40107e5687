//! Entity link markup embedded in thread text.
//!
//! Links look like `<#E::{type}::{fqn}>` with optional trailing
//! `::{field}` and `::{arrayField}` segments, e.g.
//! `<#E::table::shop.public.orders::columns::customer_id>`.

use crate::entity::{TEAM, USER};
use crate::error::{CoreError, Result};
use crate::lookup::LinkExpander;

const LINK_PREFIX: &str = "<#E::";
const LINK_SUFFIX: char = '>';
const SEPARATOR: &str = "::";

/// A parsed entity link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLink {
    pub entity_type: String,
    pub entity_fqn: String,
    pub field_name: Option<String>,
    pub array_field_name: Option<String>,
}

impl EntityLink {
    #[must_use]
    pub fn new(entity_type: impl Into<String>, entity_fqn: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_fqn: entity_fqn.into(),
            field_name: None,
            array_field_name: None,
        }
    }

    /// Parse a link from its markup form.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidEntityLink` if the markup is malformed.
    pub fn parse(markup: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidEntityLink(markup.to_string());

        let inner = markup
            .trim()
            .strip_prefix(LINK_PREFIX)
            .and_then(|rest| rest.strip_suffix(LINK_SUFFIX))
            .ok_or_else(invalid)?;

        let mut parts = inner.split(SEPARATOR);
        let entity_type = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let entity_fqn = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let field_name = parts.next().map(str::to_string);
        let array_field_name = parts.next().map(str::to_string);

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            entity_type: entity_type.to_string(),
            entity_fqn: entity_fqn.to_string(),
            field_name,
            array_field_name,
        })
    }

    /// Text shown in place of the link in rendered messages.
    #[must_use]
    pub fn display_text(&self) -> String {
        if self.entity_type == USER || self.entity_type == TEAM {
            format!("@{}", self.entity_fqn)
        } else {
            self.entity_fqn.clone()
        }
    }
}

impl std::fmt::Display for EntityLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{LINK_PREFIX}{}{SEPARATOR}{}", self.entity_type, self.entity_fqn)?;
        if let Some(field) = &self.field_name {
            write!(f, "{SEPARATOR}{field}")?;
        }
        if let Some(array_field) = &self.array_field_name {
            write!(f, "{SEPARATOR}{array_field}")?;
        }
        write!(f, "{LINK_SUFFIX}")
    }
}

/// Replaces every well-formed link in free text with its display text.
///
/// Malformed markup is left as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupLinkExpander;

impl LinkExpander for MarkupLinkExpander {
    fn expand(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(start) = rest.find(LINK_PREFIX) {
            out.push_str(&rest[..start]);
            let candidate = &rest[start..];

            match candidate.find(LINK_SUFFIX) {
                Some(end) => {
                    let markup = &candidate[..=end];
                    match EntityLink::parse(markup) {
                        Ok(link) => out.push_str(&link.display_text()),
                        Err(_) => out.push_str(markup),
                    }
                    rest = &candidate[end + 1..];
                }
                None => {
                    out.push_str(candidate);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_link() {
        let link = EntityLink::parse("<#E::table::shop.public.orders>").unwrap();
        assert_eq!(link.entity_type, "table");
        assert_eq!(link.entity_fqn, "shop.public.orders");
        assert!(link.field_name.is_none());
    }

    #[test]
    fn test_parse_field_link() {
        let link = EntityLink::parse("<#E::table::shop.orders::columns::customer_id>").unwrap();
        assert_eq!(link.field_name.as_deref(), Some("columns"));
        assert_eq!(link.array_field_name.as_deref(), Some("customer_id"));
        assert_eq!(link.to_string(), "<#E::table::shop.orders::columns::customer_id>");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for markup in ["table::orders", "<#E::table>", "<#E::::orders>", "<#E::table::orders"] {
            assert!(
                matches!(EntityLink::parse(markup), Err(CoreError::InvalidEntityLink(_))),
                "{markup} should not parse"
            );
        }
    }

    #[test]
    fn test_expand_links() {
        let expander = MarkupLinkExpander;
        let text = "<#E::user::alice> please check <#E::table::shop.orders> before Friday";
        assert_eq!(
            expander.expand(text),
            "@alice please check shop.orders before Friday"
        );
    }

    #[test]
    fn test_expand_keeps_plain_and_broken_markup() {
        let expander = MarkupLinkExpander;
        assert_eq!(expander.expand("no links here"), "no links here");
        assert_eq!(expander.expand("broken <#E::table>"), "broken <#E::table>");
        assert_eq!(expander.expand("dangling <#E::table::x"), "dangling <#E::table::x");
    }
}
