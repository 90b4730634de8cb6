//! Request types, wire encoders, and method bindings.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::debug;

use super::fixtures::{emit_random_fill, emit_struct_fill, emit_test_uses};
use super::objects::{Item, collect_declarations, emit_field, emit_item};
use super::{emit_doc_comment, emit_doc_lines, emit_file_header, string_literal};
use crate::classify::{ClassifiedNode, Classifier, NodeKind, TypeTarget, sort_fields};
use crate::error::{BindgenError, ClassifyErrorKind};
use crate::intake::Primitive;
use crate::json_pointer::JsonPointer;
use crate::naming::error_const_name;
use crate::refs::{Resolved, ScalarForm};
use crate::schema::{MethodSchema, MethodsFile};
use crate::variants::{FixedOverride, MethodVariant, error_names, expand};

const DOC_LINK: &str = "https://dev.vk.com/method/";

/// How one request field reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireForm {
    /// Serialized as one JSON document.
    Json,
    Scalar(ScalarForm),
    /// Comma-joined elements.
    List(ScalarForm),
}

#[derive(Debug, Clone)]
pub struct RequestField {
    pub node: ClassifiedNode,
    pub wire: WireForm,
}

/// Parameters of one or more bindings.
#[derive(Debug, Clone)]
pub struct Request {
    pub type_name: String,
    pub method_name: String,
    /// Sorted by field identifier.
    pub fields: Vec<RequestField>,
}

/// One emitted binding function.
#[derive(Debug, Clone)]
pub struct Binding {
    pub fn_name: String,
    pub full_name: String,
    pub method_name: String,
    pub description: Option<String>,
    pub token_types: Vec<String>,
    pub errors: Vec<String>,
    pub request: Option<String>,
    pub response: Option<String>,
    pub overrides: Vec<FixedOverride>,
}

/// Everything emitted into the methods files.
#[derive(Debug, Clone, Default)]
pub struct MethodsModel {
    pub requests: Vec<Request>,
    pub bindings: Vec<Binding>,
}

impl MethodsModel {
    /// Nested shapes declared by request fields, keyed by type name.
    #[must_use]
    pub fn declarations(&self) -> BTreeMap<String, Item<'_>> {
        let mut items: BTreeMap<String, Item<'_>> = BTreeMap::new();
        for request in &self.requests {
            for field in &request.fields {
                collect_declarations(&field.node, &mut items);
            }
        }
        items
    }
}

/// Expands and classifies every method against the sealed reference table.
///
/// # Errors
///
/// Fails on unsupported response key sets, unknown response references, and
/// parameters that cannot be form-encoded.
pub fn build_methods(
    classifier: &mut Classifier<'_>,
    methods: &MethodsFile,
) -> Result<MethodsModel, BindgenError> {
    let mut model: MethodsModel = MethodsModel::default();
    for method in &methods.methods {
        let path: JsonPointer = JsonPointer::root().child("methods").child(&method.name);
        let variants: Vec<MethodVariant<'_>> =
            expand(method).map_err(|kind| BindgenError::classify(path.clone(), kind))?;
        if variants.is_empty() {
            debug!(method = %method.name, "multi-response method skipped");
            continue;
        }
        let mut request_names: BTreeMap<String, String> = BTreeMap::new();
        for variant in &variants {
            let request: Option<String> = if !variant.has_request() {
                None
            } else if variant.owns_request() {
                let request: Request = build_request(classifier, method, variant, &path)?;
                let type_name: String = request.type_name.clone();
                request_names.insert(variant.full_name.clone(), type_name.clone());
                model.requests.push(request);
                Some(type_name)
            } else {
                request_names.get(&variant.request_owner).cloned()
            };
            let response: Option<String> = match &variant.response {
                Some(name) => Some(
                    classifier
                        .table()
                        .get(name)
                        .map_err(|kind| BindgenError::classify(path.child("responses"), kind))?
                        .type_name
                        .clone(),
                ),
                None => None,
            };
            model.bindings.push(Binding {
                fn_name: variant.binding_name(),
                full_name: variant.full_name.clone(),
                method_name: method.name.clone(),
                description: method.description.clone(),
                token_types: method.access_token_type.clone(),
                errors: error_names(&method.errors),
                request,
                response,
                overrides: variant.overrides.clone(),
            });
        }
    }
    model.requests.sort_by(|a, b| a.type_name.cmp(&b.type_name));
    model.bindings.sort_by(|a, b| a.fn_name.cmp(&b.fn_name));
    Ok(model)
}

fn build_request(
    classifier: &mut Classifier<'_>,
    method: &MethodSchema,
    variant: &MethodVariant<'_>,
    path: &JsonPointer,
) -> Result<Request, BindgenError> {
    let type_name: String = classifier.claim_name(&format!("{}Request", variant.full_name));
    let mut nodes: Vec<ClassifiedNode> = Vec::with_capacity(variant.parameters.len());
    for parameter in &variant.parameters {
        let param_path: JsonPointer = path.child("parameters").child(&parameter.name);
        nodes.push(classifier.classify_parameter(
            &type_name,
            &parameter.name,
            &parameter.node,
            param_path,
        )?);
    }
    let mut fields: Vec<RequestField> = Vec::with_capacity(nodes.len());
    for node in sort_fields(nodes) {
        let wire: WireForm = wire_form(classifier, &node)
            .map_err(|kind| BindgenError::classify(node.path.clone(), kind))?;
        fields.push(RequestField { node, wire });
    }
    Ok(Request {
        type_name,
        method_name: method.name.clone(),
        fields,
    })
}

/// Decides the wire form of a parameter after dereferencing aliases.
fn wire_form(
    classifier: &Classifier<'_>,
    node: &ClassifiedNode,
) -> Result<WireForm, ClassifyErrorKind> {
    if node.limits.is_json() {
        return Ok(WireForm::Json);
    }
    let (form, depth): (ScalarForm, usize) = match &node.kind {
        NodeKind::Alias(TypeTarget::Primitive(_)) => (ScalarForm::Plain, node.depth),
        NodeKind::Alias(TypeTarget::Reference { name, .. }) => {
            let resolved: Resolved = classifier.table().resolve_fully(name).map_err(|err| match err {
                ClassifyErrorKind::NotScalar(name) => ClassifyErrorKind::UnsupportedParameter(
                    format!("{name:?} is not a scalar and the parameter has no json format"),
                ),
                other => other,
            })?;
            (resolved.form, node.depth + resolved.depth)
        }
        NodeKind::Enum(shape) if shape.value_type == Primitive::String => {
            (ScalarForm::StringEnum, node.depth)
        }
        NodeKind::Enum(_) => (ScalarForm::NewtypeEnum, node.depth),
        _ => {
            return Err(ClassifyErrorKind::UnsupportedParameter(
                "object-shaped parameters need the json format".to_string(),
            ));
        }
    };
    match depth {
        0 => Ok(WireForm::Scalar(form)),
        1 => Ok(WireForm::List(form)),
        _ => Err(ClassifyErrorKind::UnsupportedParameter(
            "nested arrays need the json format".to_string(),
        )),
    }
}

/// Statement writing one field into `values`.
fn fill_statement(field: &RequestField) -> String {
    let node: &ClassifiedNode = &field.node;
    let key: String = string_literal(&node.name);
    let this: String = format!("self.{}", node.ident);
    let sequence: bool = node.is_sequence();
    match field.wire {
        WireForm::Json if node.required => format!("values.set_json({key}, &{this})?;"),
        WireForm::Json if sequence => {
            format!("if !{this}.is_empty() {{ values.set_json({key}, &{this})?; }}")
        }
        WireForm::Json => format!("if let Some(v) = &{this} {{ values.set_json({key}, v)?; }}"),
        WireForm::Scalar(form) => {
            let (value, optional_value): (String, &str) = match form {
                ScalarForm::Plain => (format!("&{this}"), "v"),
                ScalarForm::StringEnum => (format!("{this}.as_str()"), "v.as_str()"),
                ScalarForm::NewtypeEnum => (format!("&{this}.0"), "&v.0"),
            };
            if node.required {
                format!("values.set({key}, {value});")
            } else {
                format!("if let Some(v) = &{this} {{ values.set({key}, {optional_value}); }}")
            }
        }
        WireForm::List(form) => {
            let map: &str = match form {
                ScalarForm::Plain => "",
                ScalarForm::StringEnum => ".map(|v| v.as_str())",
                ScalarForm::NewtypeEnum => ".map(|v| v.0)",
            };
            let set: String = format!("values.set_list({key}, {this}.iter(){map});");
            if node.required {
                set
            } else {
                format!("if !{this}.is_empty() {{ {set} }}")
            }
        }
    }
}

/// Emits a complete `methods.rs`.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn emit_methods<W: Write>(
    writer: &mut W,
    model: &MethodsModel,
    runtime_path: &str,
) -> std::io::Result<()> {
    emit_file_header(writer, false)?;
    writeln!(writer, "use std::collections::BTreeMap;")?;
    writeln!(writer)?;
    writeln!(writer, "use serde::{{Deserialize, Serialize}};")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "use {runtime_path}::{{ApiOption, Caller, Context, EncodeError, FormValues, MethodError, RawJson}};"
    )?;
    writeln!(writer)?;
    writeln!(writer, "use super::*;")?;
    writeln!(writer)?;
    for item in model.declarations().values() {
        emit_item(writer, *item)?;
    }
    for request in &model.requests {
        emit_request(writer, request)?;
    }
    for binding in &model.bindings {
        emit_binding(writer, binding)?;
    }
    Ok(())
}

fn emit_request<W: Write>(writer: &mut W, request: &Request) -> std::io::Result<()> {
    let name: &str = &request.type_name;
    writeln!(writer, "/// Parameters of `{}`.", request.method_name)?;
    writeln!(writer, "#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]")?;
    writeln!(writer, "pub struct {name} {{")?;
    for field in &request.fields {
        emit_field(writer, &field.node)?;
    }
    writeln!(writer, "}}")?;
    writeln!(writer)?;

    writeln!(writer, "impl {name} {{")?;
    writeln!(writer, "    /// Writes every set parameter into `values`.")?;
    writeln!(writer, "    ///")?;
    writeln!(writer, "    /// # Errors")?;
    writeln!(writer, "    ///")?;
    writeln!(
        writer,
        "    /// Fails when a JSON-valued parameter cannot be serialized."
    )?;
    writeln!(
        writer,
        "    pub fn fill_in(&self, values: &mut FormValues) -> Result<(), EncodeError> {{"
    )?;
    for field in &request.fields {
        writeln!(writer, "        {}", fill_statement(field))?;
    }
    writeln!(writer, "        Ok(())")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}}")?;
    writeln!(writer)
}

fn response_type(binding: &Binding) -> &str {
    binding.response.as_deref().unwrap_or("()")
}

fn emit_binding<W: Write>(writer: &mut W, binding: &Binding) -> std::io::Result<()> {
    emit_doc_comment(writer, binding.description.as_deref(), "")?;
    let mut lines: Vec<String> = Vec::new();
    if !binding.token_types.is_empty() {
        let tokens: Vec<String> = binding.token_types.iter().map(|t| format!("`{t}`")).collect();
        lines.push(format!("Token types: {}.", tokens.join(", ")));
    }
    if !binding.errors.is_empty() {
        let errors: Vec<String> = binding
            .errors
            .iter()
            .map(|e| format!("`ErrorCode::{}`", error_const_name(e)))
            .collect();
        lines.push(format!("May return: {}.", errors.join(", ")));
    }
    lines.push(format!("<{DOC_LINK}{}>", binding.method_name));
    let mut separate: bool = binding.description.is_some();
    for line in &lines {
        emit_doc_lines(writer, std::slice::from_ref(line), "", separate)?;
        separate = true;
    }

    let fn_name: &str = &binding.fn_name;
    let response: &str = response_type(binding);
    writeln!(writer, "pub async fn {fn_name}<C: Caller>(")?;
    writeln!(writer, "    vk: &C,")?;
    writeln!(writer, "    ctx: &Context,")?;
    if let Some(request) = &binding.request {
        writeln!(writer, "    req: &{request},")?;
    }
    writeln!(writer, "    options: &[ApiOption],")?;
    writeln!(writer, ") -> Result<{response}, MethodError> {{")?;
    writeln!(writer, "    let mut values: FormValues = FormValues::new();")?;
    if binding.request.is_some() {
        writeln!(writer, "    req.fill_in(&mut values)?;")?;
    }
    for fixed in &binding.overrides {
        writeln!(
            writer,
            "    values.set({}, {});",
            string_literal(fixed.name),
            string_literal(fixed.value)
        )?;
    }
    writeln!(writer, "    values.apply_options(options);")?;
    let method: String = string_literal(&binding.method_name);
    if binding.response.is_some() {
        writeln!(writer, "    vk.call(ctx, {method}, values).await")?;
    } else {
        writeln!(
            writer,
            "    vk.call::<serde::de::IgnoredAny>(ctx, {method}, values).await?;"
        )?;
        writeln!(writer, "    Ok(())")?;
    }
    writeln!(writer, "}}")?;
    writeln!(writer)
}

/// Emits a complete `methods_test.rs`.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn emit_methods_tests<W: Write>(
    writer: &mut W,
    model: &MethodsModel,
    runtime_path: &str,
) -> std::io::Result<()> {
    emit_file_header(writer, true)?;
    writeln!(
        writer,
        "use {runtime_path}::{{ApiError, Context, FormValues, MethodError}};"
    )?;
    emit_test_uses(
        writer,
        runtime_path,
        &["RecordedCall", "RecordingCaller", "block_on", "fixture"],
    )?;
    writeln!(writer, "use super::methods::*;")?;
    writeln!(writer)?;
    for item in model.declarations().values() {
        if let Item::Declaration(node) = item {
            emit_random_fill(writer, node)?;
        }
    }
    for request in &model.requests {
        let idents: Vec<&str> = request.fields.iter().map(|f| f.node.ident.as_str()).collect();
        emit_struct_fill(writer, &request.type_name, &idents)?;
    }
    let requests: BTreeMap<&str, &Request> = model
        .requests
        .iter()
        .map(|r| (r.type_name.as_str(), r))
        .collect();
    for binding in &model.bindings {
        let request: Option<&Request> = binding
            .request
            .as_deref()
            .and_then(|name| requests.get(name).copied());
        emit_binding_tests(writer, binding, request)?;
    }
    Ok(())
}

/// Assertions on the literal wire keys of a recorded call: fixed overrides
/// carry their values, required parameters are present, and nothing outside
/// the declared parameters is sent.
fn emit_sent_key_checks<W: Write>(
    writer: &mut W,
    binding: &Binding,
    request: Option<&Request>,
) -> std::io::Result<()> {
    for fixed in &binding.overrides {
        writeln!(
            writer,
            "    assert_eq!(Some({}), sent.values.get({}));",
            string_literal(fixed.value),
            string_literal(fixed.name)
        )?;
    }
    let fields: &[RequestField] = request.map(|r| r.fields.as_slice()).unwrap_or_default();
    for field in fields.iter().filter(|f| f.node.required) {
        writeln!(
            writer,
            "    assert!(sent.values.contains_key({}));",
            string_literal(&field.node.name)
        )?;
    }
    let mut known: Vec<String> = fields.iter().map(|f| string_literal(&f.node.name)).collect();
    known.extend(binding.overrides.iter().map(|o| string_literal(o.name)));
    known.sort();
    known.dedup();
    writeln!(writer, "    let known: &[&str] = &[{}];", known.join(", "))?;
    writeln!(
        writer,
        "    assert!(sent.values.pairs().all(|(key, _)| known.contains(&key)));"
    )
}

fn emit_binding_tests<W: Write>(
    writer: &mut W,
    binding: &Binding,
    request: Option<&Request>,
) -> std::io::Result<()> {
    let fn_name: &str = &binding.fn_name;
    let response: &str = response_type(binding);
    let req_arg: &str = if binding.request.is_some() { "&req, " } else { "" };
    let call: String = format!("block_on({fn_name}(&vk, &Context::new(), {req_arg}&[]))");
    let emit_req = |writer: &mut W| -> std::io::Result<()> {
        if let Some(request) = &binding.request {
            writeln!(writer, "    let req: {request} = fixture();")?;
        }
        Ok(())
    };

    writeln!(writer, "#[test]")?;
    writeln!(writer, "fn {fn_name}_sends_request() {{")?;
    emit_req(writer)?;
    if binding.response.is_some() {
        writeln!(writer, "    let expected: {response} = fixture();")?;
        writeln!(
            writer,
            "    let vk: RecordingCaller = RecordingCaller::responding_with(&expected);"
        )?;
        writeln!(writer, "    let actual: {response} = {call}.unwrap();")?;
        writeln!(writer, "    assert_eq!(expected, actual);")?;
    } else {
        writeln!(writer, "    let vk: RecordingCaller = RecordingCaller::responding(\"1\");")?;
        writeln!(writer, "    {call}.unwrap();")?;
    }
    writeln!(writer, "    let mut values: FormValues = FormValues::new();")?;
    if binding.request.is_some() {
        writeln!(writer, "    req.fill_in(&mut values).unwrap();")?;
    }
    for fixed in &binding.overrides {
        writeln!(
            writer,
            "    values.set({}, {});",
            string_literal(fixed.name),
            string_literal(fixed.value)
        )?;
    }
    writeln!(writer, "    let sent: RecordedCall = vk.single_call();")?;
    writeln!(
        writer,
        "    assert_eq!({}, sent.method);",
        string_literal(&binding.method_name)
    )?;
    emit_sent_key_checks(writer, binding, request)?;
    writeln!(writer, "    assert_eq!(values, sent.values);")?;
    writeln!(writer, "}}")?;
    writeln!(writer)?;

    writeln!(writer, "#[test]")?;
    writeln!(writer, "fn {fn_name}_api_error() {{")?;
    emit_req(writer)?;
    writeln!(writer, "    let expected: ApiError = fixture();")?;
    writeln!(
        writer,
        "    let vk: RecordingCaller = RecordingCaller::api_error(expected.clone());"
    )?;
    writeln!(writer, "    let result: Result<{response}, MethodError> = {call};")?;
    writeln!(writer, "    match result {{")?;
    writeln!(writer, "        Err(MethodError::Api(actual)) => assert_eq!(expected, actual),")?;
    writeln!(writer, "        other => panic!(\"unexpected result: {{other:?}}\"),")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}}")?;
    writeln!(writer)?;

    writeln!(writer, "#[test]")?;
    writeln!(writer, "fn {fn_name}_transport_error() {{")?;
    emit_req(writer)?;
    writeln!(
        writer,
        "    let vk: RecordingCaller = RecordingCaller::transport_error(\"connection reset\");"
    )?;
    writeln!(writer, "    let result: Result<{response}, MethodError> = {call};")?;
    writeln!(writer, "    assert!(matches!(result, Err(MethodError::Transport(_))));")?;
    writeln!(writer, "}}")?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{DefinitionSet, Registry};
    use crate::naming::NameArena;
    use crate::schema::DefinitionsFile;

    const OBJECTS: &str = r##"{"definitions": {
        "base_ok_response": {"type": "integer", "enum": [1], "enumNames": ["ok"]},
        "base_bool_int": {"type": "integer", "enum": [0, 1], "enumNames": ["no", "yes"]},
        "base_sex": {"type": "string", "enum": ["male", "female"]},
        "users_user_id": {"type": "integer"},
        "users_ids": {"type": "array", "items": {"$ref": "#/definitions/users_user_id"}},
        "users_user": {"type": "object", "properties": {"id": {"type": "integer"}}},
        "base_ok": {"type": "object", "required": ["response"], "properties": {"response": {"$ref": "#/definitions/base_ok_response"}}}
    }}"##;

    fn build(methods_json: &str) -> Result<MethodsModel, BindgenError> {
        let objects: DefinitionsFile = serde_json::from_str(OBJECTS).unwrap();
        let methods: MethodsFile = serde_json::from_str(methods_json).unwrap();
        let mut arena: NameArena = NameArena::new();
        let sets: [DefinitionSet<'_>; 1] = [DefinitionSet {
            document: "objects",
            definitions: &objects.definitions,
        }];
        let registry: Registry = Registry::register(&sets, &mut arena).unwrap();
        let mut classifier: Classifier<'_> = Classifier::new(&registry, arena, false);
        build_methods(&mut classifier, &methods)
    }

    fn emitted(model: &MethodsModel) -> String {
        let mut out: Vec<u8> = Vec::new();
        emit_methods(&mut out, model, "vk_bindgen::support").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn echo_scenario() {
        let model: MethodsModel = build(
            r##"{"methods": [{"name":"test.echo","parameters":[{"name":"id","type":"integer","required":true}],"responses":{"response":{"$ref":"#/definitions/base_ok"}}}]}"##,
        )
        .unwrap();
        assert_eq!(1, model.bindings.len());
        assert_eq!(1, model.requests.len());
        let request: &Request = &model.requests[0];
        assert_eq!("TestEchoRequest", request.type_name);
        assert_eq!(1, request.fields.len());
        assert!(request.fields[0].node.required);
        assert_eq!(WireForm::Scalar(ScalarForm::Plain), request.fields[0].wire);
        assert_eq!("values.set(\"id\", &self.id);", fill_statement(&request.fields[0]));

        let source: String = emitted(&model);
        assert!(source.contains("pub struct TestEchoRequest {\n    pub id: i64,\n}"));
        assert!(source.contains("    req: &TestEchoRequest,\n"));
        assert!(source.contains(") -> Result<BaseOk, MethodError> {"));
        assert!(source.contains("    vk.call(ctx, \"test.echo\", values).await\n"));
    }

    #[test]
    fn fill_statements_follow_optionality() {
        let model: MethodsModel = build(
            r##"{"methods": [{"name":"users.get","parameters":[
                {"name":"user_ids","type":"array","items":{"type":"string"}},
                {"name":"sex","$ref":"objects.json#/definitions/base_sex","required":true},
                {"name":"online","$ref":"objects.json#/definitions/base_bool_int"},
                {"name":"ids","$ref":"objects.json#/definitions/users_ids","required":true},
                {"name":"filter","type":"array","items":{"type":"string","enum":["a","b"]},"required":true},
                {"name":"lat","type":"number"},
                {"name":"payload","type":"string","format":"json","required":true}
            ]}]}"##,
        )
        .unwrap();
        let statements: BTreeMap<String, String> = model.requests[0]
            .fields
            .iter()
            .map(|f| (f.node.name.clone(), fill_statement(f)))
            .collect();
        assert_eq!(
            "if !self.user_ids.is_empty() { values.set_list(\"user_ids\", self.user_ids.iter()); }",
            statements["user_ids"]
        );
        assert_eq!("values.set(\"sex\", self.sex.as_str());", statements["sex"]);
        assert_eq!(
            "if let Some(v) = &self.online { values.set(\"online\", &v.0); }",
            statements["online"]
        );
        assert_eq!("values.set_list(\"ids\", self.ids.iter());", statements["ids"]);
        assert_eq!(
            "values.set_list(\"filter\", self.filter.iter().map(|v| v.as_str()));",
            statements["filter"]
        );
        assert_eq!(
            "if let Some(v) = &self.lat { values.set(\"lat\", v); }",
            statements["lat"]
        );
        assert_eq!("values.set_json(\"payload\", &self.payload)?;", statements["payload"]);
        let source: String = emitted(&model);
        assert!(source.contains("pub enum UsersGetRequestFilter {"));
    }

    #[test]
    fn struct_parameter_without_json_format_is_rejected() {
        let err: BindgenError = build(
            r##"{"methods": [{"name":"users.set","parameters":[{"name":"user","$ref":"objects.json#/definitions/users_user"}]}]}"##,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BindgenError::Classify {
                kind: ClassifyErrorKind::UnsupportedParameter(_),
                ..
            }
        ));
    }

    #[test]
    fn nested_array_parameter_is_rejected() {
        let err: BindgenError = build(
            r#"{"methods": [{"name":"a.b","parameters":[{"name":"grid","type":"array","items":{"type":"array","items":{"type":"integer"}}}]}]}"#,
        )
        .unwrap_err();
        assert_eq!(
            "/methods/a.b/parameters/grid: unsupported parameter: nested arrays need the json format",
            err.to_string()
        );
    }

    #[test]
    fn overrides_follow_request_fields() {
        let model: MethodsModel = build(
            r##"{"methods": [{"name":"friends.get","parameters":[{"name":"extended","type":"boolean"},{"name":"count","type":"integer"}],
                "responses":{"response":{"$ref":"#/definitions/base_ok"},"extendedResponse":{"$ref":"#/definitions/base_ok"}}}]}"##,
        )
        .unwrap();
        assert_eq!(1, model.requests.len());
        assert_eq!(2, model.bindings.len());
        let source: String = emitted(&model);
        assert!(source.contains(
            "    req.fill_in(&mut values)?;\n    values.set(\"extended\", \"1\");\n    values.apply_options(options);\n"
        ));
        assert!(source.contains("pub async fn friends_get_extended<C: Caller>("));
        assert!(source.contains("    req: &FriendsGetRequest,\n"));
    }

    #[test]
    fn binding_without_params_or_response() {
        let model: MethodsModel = build(
            r##"{"methods": [{"name":"account.ping","description":"Pings.","access_token_type":["user"],
                "errors":[{"$ref":"errors.json#/errors/api_error_unknown"}]}]}"##,
        )
        .unwrap();
        assert!(model.requests.is_empty());
        let source: String = emitted(&model);
        assert!(source.contains(
            "/// Pings.\n///\n/// Token types: `user`.\n///\n/// May return: `ErrorCode::UNKNOWN`.\n///\n/// <https://dev.vk.com/method/account.ping>\n"
        ));
        assert!(source.contains("    ctx: &Context,\n    options: &[ApiOption],\n) -> Result<(), MethodError> {"));
        assert!(source.contains("vk.call::<serde::de::IgnoredAny>(ctx, \"account.ping\", values).await?;"));
    }

    #[test]
    fn multi_response_methods_emit_nothing() {
        let model: MethodsModel = build(
            r##"{"methods": [{"name":"execute","responses":{"multiResponse":{"$ref":"#/definitions/base_ok"}}}]}"##,
        )
        .unwrap();
        assert!(model.bindings.is_empty());
    }

    #[test]
    fn emitted_tests_cover_each_binding() {
        let model: MethodsModel = build(
            r##"{"methods": [{"name":"test.echo","parameters":[{"name":"id","type":"integer","required":true}],"responses":{"response":{"$ref":"#/definitions/base_ok"}}}]}"##,
        )
        .unwrap();
        let mut out: Vec<u8> = Vec::new();
        emit_methods_tests(&mut out, &model, "vk_bindgen::support").unwrap();
        let source: String = String::from_utf8(out).unwrap();
        assert!(source.contains("fn test_echo_sends_request() {"));
        assert!(source.contains("fn test_echo_api_error() {"));
        assert!(source.contains("fn test_echo_transport_error() {"));
        assert!(source.contains("impl RandomFill for TestEchoRequest {"));
        assert!(source.contains("    let actual: BaseOk = block_on(test_echo(&vk, &Context::new(), &req, &[])).unwrap();"));
        assert!(source.contains(
            "    assert_eq!(\"test.echo\", sent.method);\n    assert!(sent.values.contains_key(\"id\"));\n    let known: &[&str] = &[\"id\"];\n"
        ));
    }

    #[test]
    fn emitted_tests_check_override_values() {
        let model: MethodsModel = build(
            r##"{"methods": [{"name":"friends.get","parameters":[{"name":"extended","type":"boolean"},{"name":"count","type":"integer"}],
                "responses":{"response":{"$ref":"#/definitions/base_ok"},"extendedResponse":{"$ref":"#/definitions/base_ok"}}}]}"##,
        )
        .unwrap();
        let mut out: Vec<u8> = Vec::new();
        emit_methods_tests(&mut out, &model, "vk_bindgen::support").unwrap();
        let source: String = String::from_utf8(out).unwrap();
        assert!(source.contains(
            "fn friends_get_extended_sends_request() {\n    let req: FriendsGetRequest = fixture();\n"
        ));
        assert!(source.contains("    assert_eq!(Some(\"0\"), sent.values.get(\"extended\"));\n"));
        assert!(source.contains("    assert_eq!(Some(\"1\"), sent.values.get(\"extended\"));\n"));
        assert!(!source.contains("contains_key(\"count\")"));
        assert!(source.contains("    let known: &[&str] = &[\"count\", \"extended\"];\n"));
    }

    #[test]
    fn emitted_tests_without_request_expect_no_keys() {
        let model: MethodsModel =
            build(r#"{"methods": [{"name":"account.ping"}]}"#).unwrap();
        let mut out: Vec<u8> = Vec::new();
        emit_methods_tests(&mut out, &model, "vk_bindgen::support").unwrap();
        let source: String = String::from_utf8(out).unwrap();
        assert!(source.contains("    let vk: RecordingCaller = RecordingCaller::responding(\"1\");\n"));
        assert!(source.contains("    let known: &[&str] = &[];\n"));
    }
}
