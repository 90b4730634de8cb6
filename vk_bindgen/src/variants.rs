//! Method variant expansion.
//!
//! A method's response key set selects exactly one fan-out pattern; the first
//! match in [`ResponsePattern::detect`] order wins.

use std::collections::BTreeMap;

use crate::error::ClassifyErrorKind;
use crate::naming::{field_name, type_name};
use crate::schema::{MethodSchema, ParameterSchema, Reference, SchemaNode, reference_name};

const MULTI_RESPONSE: &str = "multiResponse";
const RESPONSE: &str = "response";
const RESPONSE_INTEGER: &str = "responseInteger";
const RESPONSE_ARRAY: &str = "responseArray";
const USER_IDS_RESPONSE: &str = "userIdsResponse";
const USER_IDS_EXTENDED_RESPONSE: &str = "userIds_Extended_Response";
const TARGET_UIDS_RESPONSE: &str = "targetUidsResponse";
const ONLINE_MOBILE_RESPONSE: &str = "onlineMobileResponse";
const EXTENDED_RESPONSE: &str = "extendedResponse";

/// Fan-out pattern of one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePattern {
    MultiResponse,
    CounterPair,
    UserIdsExtended,
    UserIds,
    TargetUids,
    OnlineMobile,
    Extended,
    Single,
    NoResponse,
}

impl ResponsePattern {
    /// Selects the pattern for a response key set.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyErrorKind::MismatchedResponses`] when only one of
    /// `responseInteger` and `responseArray` is present.
    pub fn detect<V>(responses: &BTreeMap<String, V>) -> Result<Self, ClassifyErrorKind> {
        let has = |key: &str| responses.contains_key(key);
        if has(MULTI_RESPONSE) {
            return Ok(Self::MultiResponse);
        }
        match (has(RESPONSE_INTEGER), has(RESPONSE_ARRAY)) {
            (true, true) => return Ok(Self::CounterPair),
            (true, false) => {
                return Err(ClassifyErrorKind::MismatchedResponses(RESPONSE_INTEGER.to_string()));
            }
            (false, true) => {
                return Err(ClassifyErrorKind::MismatchedResponses(RESPONSE_ARRAY.to_string()));
            }
            (false, false) => {}
        }
        let pattern: Self = if has(USER_IDS_RESPONSE) && has(USER_IDS_EXTENDED_RESPONSE) {
            Self::UserIdsExtended
        } else if has(USER_IDS_RESPONSE) {
            Self::UserIds
        } else if has(TARGET_UIDS_RESPONSE) {
            Self::TargetUids
        } else if has(ONLINE_MOBILE_RESPONSE) {
            Self::OnlineMobile
        } else if has(EXTENDED_RESPONSE) {
            Self::Extended
        } else if has(RESPONSE) {
            Self::Single
        } else {
            Self::NoResponse
        };
        Ok(pattern)
    }

    /// Number of bindings the pattern produces.
    #[must_use]
    pub fn binding_count(self) -> usize {
        match self {
            Self::MultiResponse => 0,
            Self::UserIdsExtended => 3,
            Self::CounterPair
            | Self::UserIds
            | Self::TargetUids
            | Self::OnlineMobile
            | Self::Extended => 2,
            Self::Single | Self::NoResponse => 1,
        }
    }
}

/// Wire key a binding sets to a constant after the request fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOverride {
    pub name: &'static str,
    pub value: &'static str,
}

const NOT_EXTENDED: FixedOverride = FixedOverride {
    name: "extended",
    value: "0",
};
const EXTENDED: FixedOverride = FixedOverride {
    name: "extended",
    value: "1",
};
const NOT_ONLINE_MOBILE: FixedOverride = FixedOverride {
    name: "online_mobile",
    value: "0",
};
const ONLINE_MOBILE: FixedOverride = FixedOverride {
    name: "online_mobile",
    value: "1",
};

/// One concrete binding derived from a method.
#[derive(Debug, Clone)]
pub struct MethodVariant<'m> {
    /// Source method; description, token kinds and errors are inherited.
    pub method: &'m MethodSchema,
    /// `PascalCase` binding name, e.g. `MessagesGetHistoryUserIds`.
    pub full_name: String,
    /// `full_name` of the variant whose request type this binding takes.
    pub request_owner: String,
    /// Response definition name.
    pub response: Option<String>,
    /// Parameters after removals, in schema order.
    pub parameters: Vec<&'m ParameterSchema>,
    pub overrides: Vec<FixedOverride>,
}

impl MethodVariant<'_> {
    /// Function name of the binding.
    #[must_use]
    pub fn binding_name(&self) -> String {
        field_name(&self.full_name)
    }

    #[must_use]
    pub fn owns_request(&self) -> bool {
        self.request_owner == self.full_name
    }

    #[must_use]
    pub fn has_request(&self) -> bool {
        !self.parameters.is_empty()
    }

    fn derive(&self, suffix: &str, response: Option<String>) -> Self {
        let full_name: String = format!("{}{suffix}", type_name(&self.method.name));
        Self {
            method: self.method,
            request_owner: full_name.clone(),
            full_name,
            response,
            parameters: self.method.parameters.iter().collect(),
            overrides: Vec::new(),
        }
    }

    /// Takes `owner`'s request type and parameters.
    fn sharing_request_of(mut self, owner: &Self) -> Self {
        self.request_owner.clone_from(&owner.request_owner);
        self.parameters.clone_from(&owner.parameters);
        self
    }

    fn without(mut self, names: &[&str]) -> Self {
        self.parameters.retain(|p| !names.contains(&p.name.as_str()));
        self
    }

    fn with_override(mut self, fixed: FixedOverride) -> Self {
        self.overrides.push(fixed);
        self
    }
}

fn response_ref(
    responses: &BTreeMap<String, SchemaNode>,
    key: &str,
) -> Result<Option<String>, ClassifyErrorKind> {
    match responses.get(key) {
        None => Ok(None),
        Some(node) => node
            .reference
            .as_deref()
            .map(|r| Some(reference_name(r).to_string()))
            .ok_or_else(|| ClassifyErrorKind::ResponseWithoutReference(key.to_string())),
    }
}

/// Error definition names a method may return.
#[must_use]
pub fn error_names(errors: &[Reference]) -> Vec<String> {
    errors
        .iter()
        .map(|e| reference_name(&e.reference).to_string())
        .collect()
}

/// Expands `method` into its bindings, base binding first.
///
/// # Errors
///
/// Fails for mismatched `responseInteger`/`responseArray` pairs and response
/// entries without a `$ref`.
pub fn expand(method: &MethodSchema) -> Result<Vec<MethodVariant<'_>>, ClassifyErrorKind> {
    let responses: &BTreeMap<String, SchemaNode> = &method.responses;
    let pattern: ResponsePattern = ResponsePattern::detect(responses)?;
    let full_name: String = type_name(&method.name);
    let base: MethodVariant<'_> = MethodVariant {
        method,
        request_owner: full_name.clone(),
        full_name,
        response: response_ref(responses, RESPONSE)?,
        parameters: method.parameters.iter().collect(),
        overrides: Vec::new(),
    };

    let variants: Vec<MethodVariant<'_>> = match pattern {
        ResponsePattern::MultiResponse => Vec::new(),
        ResponsePattern::CounterPair => {
            let not_secure: MethodVariant<'_> = base
                .derive("NotSecure", response_ref(responses, RESPONSE_ARRAY)?)
                .without(&["user_id", "counter", "increment"]);
            let primary: MethodVariant<'_> = MethodVariant {
                response: response_ref(responses, RESPONSE_INTEGER)?,
                ..base
            }
            .without(&["counters"]);
            vec![primary, not_secure]
        }
        ResponsePattern::UserIdsExtended => {
            let user_ids: MethodVariant<'_> = base
                .derive("UserIds", response_ref(responses, USER_IDS_RESPONSE)?)
                .without(&["extended", "user_id"])
                .with_override(NOT_EXTENDED);
            let extended_user_ids: MethodVariant<'_> = base
                .derive(
                    "ExtendedUserIds",
                    response_ref(responses, USER_IDS_EXTENDED_RESPONSE)?,
                )
                .sharing_request_of(&user_ids)
                .with_override(EXTENDED);
            let primary: MethodVariant<'_> = base
                .without(&["extended", "user_ids"])
                .with_override(NOT_EXTENDED);
            vec![primary, user_ids, extended_user_ids]
        }
        ResponsePattern::UserIds => {
            let user_ids: MethodVariant<'_> = base
                .derive("UserIds", response_ref(responses, USER_IDS_RESPONSE)?)
                .without(&["peer_id"]);
            vec![base.without(&["peer_ids"]), user_ids]
        }
        ResponsePattern::TargetUids => {
            let target_uids: MethodVariant<'_> = base
                .derive("TargetUids", response_ref(responses, TARGET_UIDS_RESPONSE)?)
                .without(&["target_uid"]);
            vec![base.without(&["target_uids"]), target_uids]
        }
        ResponsePattern::OnlineMobile => {
            let primary: MethodVariant<'_> = base
                .without(&["online_mobile"])
                .with_override(NOT_ONLINE_MOBILE);
            let online_mobile: MethodVariant<'_> = primary
                .derive("OnlineMobile", response_ref(responses, ONLINE_MOBILE_RESPONSE)?)
                .sharing_request_of(&primary)
                .with_override(ONLINE_MOBILE);
            vec![primary, online_mobile]
        }
        ResponsePattern::Extended => {
            let primary: MethodVariant<'_> =
                base.without(&["extended"]).with_override(NOT_EXTENDED);
            let extended: MethodVariant<'_> = primary
                .derive("Extended", response_ref(responses, EXTENDED_RESPONSE)?)
                .sharing_request_of(&primary)
                .with_override(EXTENDED);
            vec![primary, extended]
        }
        ResponsePattern::Single | ResponsePattern::NoResponse => vec![base],
    };
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(json: &str) -> MethodSchema {
        serde_json::from_str(json).unwrap()
    }

    fn params(variant: &MethodVariant<'_>) -> Vec<String> {
        variant.parameters.iter().map(|p| p.name.clone()).collect()
    }

    fn names(variants: &[MethodVariant<'_>]) -> Vec<String> {
        variants.iter().map(|v| v.full_name.clone()).collect()
    }

    const PARAMS: &str = r#"[
        {"name": "user_id", "type": "integer"},
        {"name": "user_ids", "type": "string"},
        {"name": "peer_id", "type": "integer"},
        {"name": "peer_ids", "type": "string"},
        {"name": "target_uid", "type": "integer"},
        {"name": "target_uids", "type": "string"},
        {"name": "extended", "type": "boolean"},
        {"name": "online_mobile", "type": "boolean"},
        {"name": "counters", "type": "string"},
        {"name": "counter", "type": "integer"},
        {"name": "increment", "type": "boolean"}
    ]"#;

    fn with_responses(responses: &[&str]) -> MethodSchema {
        let entries: Vec<String> = responses
            .iter()
            .map(|key| format!(r##""{key}": {{"$ref": "responses.json#/definitions/{key}_ref"}}"##))
            .collect();
        method(&format!(
            r#"{{"name": "account.setCounter", "parameters": {PARAMS}, "responses": {{{}}}}}"#,
            entries.join(",")
        ))
    }

    #[test]
    fn echo_scenario_single_binding() {
        let m: MethodSchema = method(
            r##"{"name":"test.echo","parameters":[{"name":"id","type":"integer","required":true}],"responses":{"response":{"$ref":"#/definitions/base_ok"}}}"##,
        );
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert_eq!(1, variants.len());
        assert_eq!("test_echo", variants[0].binding_name());
        assert_eq!(Some("base_ok".to_string()), variants[0].response);
        assert_eq!(vec!["id".to_string()], params(&variants[0]));
        assert!(variants[0].owns_request());
    }

    #[test]
    fn multi_response_is_skipped() {
        let m: MethodSchema = with_responses(&["response", "multiResponse"]);
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert!(variants.is_empty());
    }

    #[test]
    fn counter_pair() {
        let m: MethodSchema = with_responses(&["responseInteger", "responseArray"]);
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert_eq!(
            vec!["AccountSetCounter".to_string(), "AccountSetCounterNotSecure".to_string()],
            names(&variants)
        );
        assert!(!params(&variants[0]).contains(&"counters".to_string()));
        assert!(params(&variants[0]).contains(&"user_id".to_string()));
        let not_secure: Vec<String> = params(&variants[1]);
        for removed in ["user_id", "counter", "increment"] {
            assert!(!not_secure.contains(&removed.to_string()));
        }
        assert!(not_secure.contains(&"counters".to_string()));
        assert_eq!(Some("responseInteger_ref".to_string()), variants[0].response);
        assert_eq!(Some("responseArray_ref".to_string()), variants[1].response);
        assert!(variants[1].owns_request());
    }

    #[test]
    fn counter_pair_requires_both_keys() {
        let err: ClassifyErrorKind = expand(&with_responses(&["responseInteger"])).unwrap_err();
        assert_eq!(ClassifyErrorKind::MismatchedResponses("responseInteger".to_string()), err);
    }

    #[test]
    fn user_ids_extended_triple() {
        let m: MethodSchema =
            with_responses(&["response", "userIdsResponse", "userIds_Extended_Response"]);
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert_eq!(
            vec![
                "AccountSetCounter".to_string(),
                "AccountSetCounterUserIds".to_string(),
                "AccountSetCounterExtendedUserIds".to_string()
            ],
            names(&variants)
        );
        let base: Vec<String> = params(&variants[0]);
        assert!(!base.contains(&"extended".to_string()));
        assert!(!base.contains(&"user_ids".to_string()));
        assert_eq!(vec![NOT_EXTENDED], variants[0].overrides);

        let user_ids: Vec<String> = params(&variants[1]);
        assert!(!user_ids.contains(&"user_id".to_string()));
        assert!(user_ids.contains(&"user_ids".to_string()));
        assert_eq!(vec![NOT_EXTENDED], variants[1].overrides);

        assert_eq!("AccountSetCounterUserIds", variants[2].request_owner);
        assert_eq!(user_ids, params(&variants[2]));
        assert_eq!(vec![EXTENDED], variants[2].overrides);
        assert!(!variants[2].owns_request());
    }

    #[test]
    fn user_ids_pair() {
        let m: MethodSchema = with_responses(&["response", "userIdsResponse"]);
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert_eq!(2, variants.len());
        assert!(!params(&variants[0]).contains(&"peer_ids".to_string()));
        assert!(params(&variants[0]).contains(&"peer_id".to_string()));
        assert!(!params(&variants[1]).contains(&"peer_id".to_string()));
        assert!(variants[1].owns_request());
        assert_eq!(Some("userIdsResponse_ref".to_string()), variants[1].response);
    }

    #[test]
    fn target_uids_pair() {
        let m: MethodSchema = with_responses(&["response", "targetUidsResponse"]);
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert_eq!("AccountSetCounterTargetUids", variants[1].full_name);
        assert!(!params(&variants[0]).contains(&"target_uids".to_string()));
        assert!(!params(&variants[1]).contains(&"target_uid".to_string()));
    }

    #[test]
    fn online_mobile_shares_base_request() {
        let m: MethodSchema = with_responses(&["response", "onlineMobileResponse"]);
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert_eq!(vec![NOT_ONLINE_MOBILE], variants[0].overrides);
        assert_eq!(vec![ONLINE_MOBILE], variants[1].overrides);
        assert_eq!("AccountSetCounter", variants[1].request_owner);
        assert!(!params(&variants[1]).contains(&"online_mobile".to_string()));
    }

    #[test]
    fn extended_shares_base_request() {
        let m: MethodSchema = with_responses(&["response", "extendedResponse"]);
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert_eq!(
            vec!["AccountSetCounter".to_string(), "AccountSetCounterExtended".to_string()],
            names(&variants)
        );
        assert_eq!(params(&variants[0]), params(&variants[1]));
        assert!(!params(&variants[0]).contains(&"extended".to_string()));
        assert_eq!(vec![EXTENDED], variants[1].overrides);
    }

    #[test]
    fn no_response_single_binding() {
        let m: MethodSchema = with_responses(&[]);
        let variants: Vec<MethodVariant<'_>> = expand(&m).unwrap();
        assert_eq!(1, variants.len());
        assert_eq!(None, variants[0].response);
    }

    #[test]
    fn every_key_set_matches_exactly_one_pattern() {
        let keys: [&str; 9] = [
            MULTI_RESPONSE,
            RESPONSE,
            RESPONSE_INTEGER,
            RESPONSE_ARRAY,
            USER_IDS_RESPONSE,
            USER_IDS_EXTENDED_RESPONSE,
            TARGET_UIDS_RESPONSE,
            ONLINE_MOBILE_RESPONSE,
            EXTENDED_RESPONSE,
        ];
        for mask in 0u32..(1 << keys.len()) {
            let selected: Vec<&str> = keys
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, k)| *k)
                .collect();
            let m: MethodSchema = with_responses(&selected);
            match (ResponsePattern::detect(&m.responses), expand(&m)) {
                (Ok(pattern), Ok(variants)) => assert_eq!(pattern.binding_count(), variants.len()),
                (Err(a), Err(b)) => assert_eq!(a, b),
                (pattern, variants) => panic!("{selected:?}: {pattern:?} vs {:?}", variants.map(|v| v.len())),
            }
        }
    }

    #[test]
    fn response_without_reference_is_fatal() {
        let m: MethodSchema = method(r#"{"name":"a.b","responses":{"response":{"type":"integer"}}}"#);
        assert_eq!(
            ClassifyErrorKind::ResponseWithoutReference("response".to_string()),
            expand(&m).unwrap_err()
        );
    }
}
