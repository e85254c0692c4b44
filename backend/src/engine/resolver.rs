//! Placeholder resolution over flattened markup.
//!
//! Tokens look like `{{namespace.field}}`. Resolution is total: a token whose
//! namespace is unbound, whose field is unknown or whose value is absent is
//! replaced by the fallback and reported, never raised. Substituted values are
//! escaped and have their braces entity-encoded, so the output contains no
//! tokens that were not already in the input and a second pass is a no-op.

use super::escape_html;
use chrono::NaiveDate;
use common::model::context::{ContractRecord, MemberRecord, RenderContext, TenantRecord};
use common::model::legal::LegalDocumentType;
use common::model::placeholder::PlaceholderNamespace;
use log::warn;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_]*)\.([A-Za-z][A-Za-z0-9_]*)\s*\}\}")
        .expect("placeholder pattern is valid")
});

/// What to put in place of a token that has no value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingValuePolicy {
    /// Nothing at all.
    #[default]
    Empty,
    /// An empty, styled marker element so a blank field stays visible.
    Marked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub content: String,
    /// Distinct `namespace.field` keys that fell back, in first-seen order.
    pub unresolved: Vec<String>,
}

enum Value {
    Text(String),
    Markup(String),
}

/// Resolves every token in `content` against `context`.
///
/// Substitution repeats until no token is left, because removing a token can
/// join the text around it into a new one (`{{member.{{x.y}}firstName}}`).
/// Every pass drops the braces of the tokens it replaced and inserts none, so
/// the loop ends.
pub fn resolve_with(
    content: &str,
    context: &RenderContext,
    policy: MissingValuePolicy,
) -> Resolution {
    let mut unresolved: Vec<String> = Vec::new();
    let mut current = content.to_string();
    while TOKEN.is_match(&current) {
        current = substitute(&current, context, policy, &mut unresolved);
    }

    if !unresolved.is_empty() {
        warn!(
            "{} placeholder(s) resolved to fallback: {}",
            unresolved.len(),
            unresolved.join(", ")
        );
    }

    Resolution {
        content: current,
        unresolved,
    }
}

fn substitute(
    content: &str,
    context: &RenderContext,
    policy: MissingValuePolicy,
    unresolved: &mut Vec<String>,
) -> String {
    TOKEN
        .replace_all(content, |caps: &Captures| {
            let namespace = &caps[1];
            let field = &caps[2];
            match lookup(namespace, field, context) {
                Some(Value::Text(text)) => neutralize_braces(&escape_html(&text)),
                Some(Value::Markup(markup)) => neutralize_braces(&markup),
                None => {
                    let key = format!("{}.{}", namespace, field);
                    let replacement = match policy {
                        MissingValuePolicy::Empty => String::new(),
                        MissingValuePolicy::Marked => format!(
                            "<span class=\"placeholder-missing\" data-placeholder=\"{}\"></span>",
                            key
                        ),
                    };
                    if !unresolved.contains(&key) {
                        unresolved.push(key);
                    }
                    replacement
                }
            }
        })
        .into_owned()
}

/// Distinct `namespace.field` keys of all tokens in `content`, in order.
pub fn tokens(content: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in TOKEN.captures_iter(content) {
        let key = format!("{}.{}", &caps[1], &caps[2]);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

fn neutralize_braces(value: &str) -> String {
    value.replace('{', "&#123;").replace('}', "&#125;")
}

fn lookup(namespace: &str, field: &str, context: &RenderContext) -> Option<Value> {
    let namespace: PlaceholderNamespace = namespace.parse().ok()?;
    match namespace {
        PlaceholderNamespace::Member => member_value(context.member.as_ref()?, field).map(Value::Text),
        PlaceholderNamespace::Contract => {
            contract_value(context.contract.as_ref()?, field).map(Value::Text)
        }
        PlaceholderNamespace::Tenant => tenant_value(context.tenant.as_ref()?, field).map(Value::Text),
        PlaceholderNamespace::System => system_value(context, field).map(Value::Text),
        PlaceholderNamespace::Legal => {
            let document_type = LegalDocumentType::from_placeholder_field(field)?;
            context
                .legal_documents
                .get(&document_type)
                .cloned()
                .map(Value::Markup)
        }
    }
}

fn member_value(member: &MemberRecord, field: &str) -> Option<String> {
    let value = match field {
        "memberNumber" => member.member_number.clone(),
        "firstName" => Some(member.first_name.clone()),
        "lastName" => Some(member.last_name.clone()),
        "fullName" => Some(
            format!("{} {}", member.first_name, member.last_name)
                .trim()
                .to_string(),
        ),
        "email" => member.email.clone(),
        "phone" => member.phone.clone(),
        "birthDate" => member.birth_date.map(format_date),
        "street" => member.street.clone(),
        "postalCode" => member.postal_code.clone(),
        "city" => member.city.clone(),
        _ => None,
    };
    value.filter(|v| !v.is_empty())
}

fn contract_value(contract: &ContractRecord, field: &str) -> Option<String> {
    let value = match field {
        "contractNumber" => contract.contract_number.clone(),
        "tariffName" => Some(contract.tariff_name.clone()),
        "monthlyFee" => Some(format_currency(contract.monthly_fee_cents)),
        "startDate" => contract.start_date.map(format_date),
        "endDate" => contract.end_date.map(format_date),
        "minimumTerm" => contract.minimum_term_months.map(|m| m.to_string()),
        "noticePeriod" => contract.notice_period_months.map(|m| m.to_string()),
        "iban" => contract.iban.clone(),
        "mandateReference" => contract.mandate_reference.clone(),
        _ => None,
    };
    value.filter(|v| !v.is_empty())
}

fn tenant_value(tenant: &TenantRecord, field: &str) -> Option<String> {
    let value = match field {
        "name" => Some(tenant.name.clone()),
        "legalName" => tenant.legal_name.clone(),
        "street" => tenant.street.clone(),
        "postalCode" => tenant.postal_code.clone(),
        "city" => tenant.city.clone(),
        "email" => tenant.email.clone(),
        "phone" => tenant.phone.clone(),
        "website" => tenant.website.clone(),
        "creditorId" => tenant.creditor_id.clone(),
        _ => None,
    };
    value.filter(|v| !v.is_empty())
}

fn system_value(context: &RenderContext, field: &str) -> Option<String> {
    match field {
        "date" => Some(format_date(context.now.date_naive())),
        "year" => Some(context.now.format("%Y").to_string()),
        "dateTime" => Some(context.now.format("%d.%m.%Y %H:%M").to_string()),
        _ => None,
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Formats cents the way the contracts print amounts, e.g. `1.234,50 €`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let euros = (abs / 100).to_string();
    let rest = abs % 100;

    let mut grouped = String::with_capacity(euros.len() + euros.len() / 3);
    for (i, ch) in euros.chars().enumerate() {
        if i > 0 && (euros.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{}{},{:02} €", sign, grouped, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::model::placeholder::catalog;

    fn resolve(content: &str, context: &RenderContext) -> String {
        resolve_with(content, context, MissingValuePolicy::Empty).content
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    fn member() -> MemberRecord {
        MemberRecord {
            id: "m1".to_string(),
            member_number: Some("M-0042".to_string()),
            first_name: "Kenji".to_string(),
            last_name: "Tanaka".to_string(),
            email: Some("kenji@example.org".to_string()),
            phone: Some("0171 000000".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1990, 7, 1),
            street: Some("Hauptstr. 1".to_string()),
            postal_code: Some("20095".to_string()),
            city: Some("Hamburg".to_string()),
            last_active_at: Some(1),
        }
    }

    fn contract() -> ContractRecord {
        ContractRecord {
            id: "c1".to_string(),
            member_id: "m1".to_string(),
            contract_number: Some("V-2026-001".to_string()),
            tariff_name: "Erwachsene Flex".to_string(),
            monthly_fee_cents: 123_450,
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            end_date: NaiveDate::from_ymd_opt(2027, 3, 31),
            minimum_term_months: Some(12),
            notice_period_months: Some(3),
            iban: Some("DE02120300000000202051".to_string()),
            mandate_reference: Some("MR-42".to_string()),
        }
    }

    fn tenant() -> TenantRecord {
        TenantRecord {
            id: "t1".to_string(),
            name: "Dojo Nord".to_string(),
            legal_name: Some("Dojo Nord e.V.".to_string()),
            street: Some("Am Hafen 3".to_string()),
            postal_code: Some("20457".to_string()),
            city: Some("Hamburg".to_string()),
            email: Some("info@dojo-nord.de".to_string()),
            phone: Some("040 123".to_string()),
            website: Some("https://dojo-nord.de".to_string()),
            creditor_id: Some("DE98ZZZ09999999999".to_string()),
        }
    }

    fn full_context() -> RenderContext {
        let mut ctx = RenderContext::empty(now())
            .with_member(member())
            .with_contract(contract())
            .with_tenant(tenant());
        for t in LegalDocumentType::ALL {
            ctx = ctx.with_legal_document(t, format!("<p>{} text</p>", t));
        }
        ctx
    }

    #[test]
    fn test_resolves_each_namespace() {
        let out = resolve(
            "{{member.fullName}} / {{ contract.monthlyFee }} / {{tenant.name}} / {{system.date}}",
            &full_context(),
        );
        assert_eq!(out, "Kenji Tanaka / 1.234,50 € / Dojo Nord / 14.03.2026");
    }

    #[test]
    fn test_every_catalog_entry_resolves_with_full_context() {
        let ctx = full_context();
        for def in catalog() {
            let resolution = resolve_with(&def.token(), &ctx, MissingValuePolicy::Empty);
            assert!(
                resolution.unresolved.is_empty(),
                "{} did not resolve",
                def.key()
            );
            assert!(!resolution.content.is_empty(), "{} is empty", def.key());
        }
    }

    #[test]
    fn test_unbound_namespace_falls_back_to_empty() {
        let ctx = RenderContext::empty(now()).with_member(member());
        let resolution = resolve_with(
            "Fee: [{{contract.fee}}] [{{contract.monthlyFee}}] {{member.firstName}}",
            &ctx,
            MissingValuePolicy::Empty,
        );
        assert_eq!(resolution.content, "Fee: [] [] Kenji");
        assert_eq!(
            resolution.unresolved,
            vec!["contract.fee".to_string(), "contract.monthlyFee".to_string()]
        );
    }

    #[test]
    fn test_unknown_namespace_and_field_fall_back() {
        let ctx = full_context();
        assert_eq!(resolve("a{{billing.total}}b{{member.shoeSize}}c", &ctx), "abc");
    }

    #[test]
    fn test_absent_optional_value_falls_back() {
        let mut m = member();
        m.email = None;
        let ctx = RenderContext::empty(now()).with_member(m);
        assert_eq!(resolve("<{{member.email}}>", &ctx), "<>");
    }

    #[test]
    fn test_marked_policy_emits_empty_marker() {
        let ctx = RenderContext::empty(now());
        let resolution = resolve_with("x{{contract.iban}}y", &ctx, MissingValuePolicy::Marked);
        assert_eq!(
            resolution.content,
            "x<span class=\"placeholder-missing\" data-placeholder=\"contract.iban\"></span>y"
        );
    }

    #[test]
    fn test_values_are_escaped_and_cannot_inject_tokens() {
        let mut m = member();
        m.first_name = "<script>{{member.lastName}}".to_string();
        let ctx = RenderContext::empty(now()).with_member(m);
        let once = resolve("{{member.firstName}}", &ctx);
        assert_eq!(once, "&lt;script&gt;&#123;&#123;member.lastName&#125;&#125;");
        assert!(tokens(&once).is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let inputs = [
            "plain text without tokens",
            "{{member.firstName}} {{contract.fee}} {{legal.terms}} {{system.year}}",
            "{{ broken.token",
            "{{notanamespace}} {{tenant.creditorId}}",
            "{{member.{{system.nothing}}firstName}}",
            "{{{{contract.none}}member.lastName}}}}",
        ];
        let contexts = [
            full_context(),
            RenderContext::empty(now()),
            RenderContext::empty(now()).with_member(member()),
        ];
        for input in inputs {
            for ctx in &contexts {
                for policy in [MissingValuePolicy::Empty, MissingValuePolicy::Marked] {
                    let once = resolve_with(input, ctx, policy).content;
                    let twice = resolve_with(&once, ctx, policy).content;
                    assert_eq!(once, twice, "input {:?}", input);
                }
            }
        }
    }

    #[test]
    fn test_tokens_joined_by_a_fallback_are_resolved() {
        let ctx = RenderContext::empty(now()).with_member(member());
        let resolution = resolve_with(
            "{{member.{{system.nothing}}firstName}}",
            &ctx,
            MissingValuePolicy::Empty,
        );
        assert_eq!(resolution.content, "Kenji");
        assert_eq!(resolution.unresolved, vec!["system.nothing".to_string()]);

        let marked = resolve_with(
            "{{member.{{system.nothing}}firstName}}",
            &ctx,
            MissingValuePolicy::Marked,
        );
        assert!(tokens(&marked.content).is_empty());
    }

    #[test]
    fn test_legal_transclusion_keeps_markup() {
        let ctx = RenderContext::empty(now())
            .with_legal_document(LegalDocumentType::Terms, "<p>AGB {Stand 2026}</p>");
        assert_eq!(
            resolve("{{legal.terms}}", &ctx),
            "<p>AGB &#123;Stand 2026&#125;</p>"
        );
        assert_eq!(resolve("{{legal.privacy}}", &ctx), "");
    }

    #[test]
    fn test_tokens_are_distinct_and_ordered() {
        assert_eq!(
            tokens("{{b.x}} {{a.y}} {{ b.x }}"),
            vec!["b.x".to_string(), "a.y".to_string()]
        );
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(4990), "49,90 €");
        assert_eq!(format_currency(5), "0,05 €");
        assert_eq!(format_currency(123_456_789), "1.234.567,89 €");
        assert_eq!(format_currency(-500), "-5,00 €");
    }
}
