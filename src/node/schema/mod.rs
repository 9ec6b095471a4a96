//! Node parameter schema
//!
//! Static description of every form field the host renders for this node.
//! The schema is pure data: it is serialized for the host UI and consulted for
//! parameter defaults when the host does not supply a value.

mod article;
mod category;
mod field;
mod media;
mod tag;

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::joomla::credentials::CREDENTIALS_NAME;
use crate::resource::options::LoadOptionsMethod;
use crate::resource::protocol::{Operation, Resource};

/// Form control kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    Boolean,
    Collection,
    FixedCollection,
    Json,
    MultiOptions,
    Number,
    Options,
    String,
}

/// One entry of a dropdown, static or loaded from the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyOption {
    pub name: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl PropertyOption {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
            action: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// A named group of a fixed collection (e.g. one custom field row)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    pub display_name: &'static str,
    pub name: &'static str,
    pub values: Vec<NodeProperty>,
}

/// Nested content of a property: dropdown choices, collection members or
/// fixed collection groups
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PropertyOptions {
    None,
    Choices(Vec<PropertyOption>),
    Fields(Vec<NodeProperty>),
    Groups(Vec<FieldGroup>),
}

impl PropertyOptions {
    fn is_none(&self) -> bool {
        matches!(self, PropertyOptions::None)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_options_method: Option<LoadOptionsMethod>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub multiple_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub password: bool,
}

/// Visibility rules: every listed parameter must hold one of the listed values
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayOptions {
    pub show: BTreeMap<String, Vec<Value>>,
}

impl DisplayOptions {
    /// Whether the rule admits the given resource/operation. Conditions on
    /// other parameters are ignored here.
    pub fn admits(&self, resource: Resource, operation: Operation) -> bool {
        let allows = |key: &str, value: &str| {
            self.show
                .get(key)
                .map(|values| values.iter().any(|v| v.as_str() == Some(value)))
                .unwrap_or(true)
        };
        allows("resource", resource.as_str()) && allows("operation", operation.as_str())
    }
}

/// One form field
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub default: Value,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_data_expression: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_options: Option<DisplayOptions>,
    #[serde(skip_serializing_if = "PropertyOptions::is_none")]
    pub options: PropertyOptions,
}

impl NodeProperty {
    pub fn new(name: &'static str, display_name: &'static str, kind: PropertyType) -> Self {
        let default = match kind {
            PropertyType::Boolean => json!(false),
            PropertyType::Number => json!(0),
            PropertyType::Collection | PropertyType::FixedCollection => json!({}),
            PropertyType::MultiOptions => json!([]),
            PropertyType::Json | PropertyType::Options | PropertyType::String => json!(""),
        };
        Self {
            display_name,
            name,
            kind,
            default,
            required: false,
            no_data_expression: false,
            description: None,
            placeholder: None,
            type_options: None,
            display_options: None,
            options: PropertyOptions::None,
        }
    }

    pub fn string(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, PropertyType::String)
    }

    pub fn number(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, PropertyType::Number)
    }

    pub fn boolean(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, PropertyType::Boolean)
    }

    pub fn json(name: &'static str, display_name: &'static str) -> Self {
        Self::new(name, display_name, PropertyType::Json).default(json!("{}"))
    }

    /// Dropdown with static choices
    pub fn choice(
        name: &'static str,
        display_name: &'static str,
        choices: Vec<PropertyOption>,
    ) -> Self {
        let mut property = Self::new(name, display_name, PropertyType::Options);
        property.options = PropertyOptions::Choices(choices);
        property
    }

    /// Dropdown filled by a loader
    pub fn loaded(
        name: &'static str,
        display_name: &'static str,
        method: LoadOptionsMethod,
    ) -> Self {
        let mut property = Self::new(name, display_name, PropertyType::Options);
        property.type_options_mut().load_options_method = Some(method);
        property
    }

    pub fn multi_choice(
        name: &'static str,
        display_name: &'static str,
        choices: Vec<PropertyOption>,
    ) -> Self {
        let mut property = Self::new(name, display_name, PropertyType::MultiOptions);
        property.options = PropertyOptions::Choices(choices);
        property
    }

    /// Collection the user adds members to one by one
    pub fn collection(
        name: &'static str,
        display_name: &'static str,
        placeholder: &'static str,
        fields: Vec<NodeProperty>,
    ) -> Self {
        let mut property = Self::new(name, display_name, PropertyType::Collection);
        property.placeholder = Some(placeholder);
        property.options = PropertyOptions::Fields(fields);
        property
    }

    pub fn fixed_collection(
        name: &'static str,
        display_name: &'static str,
        placeholder: &'static str,
        groups: Vec<FieldGroup>,
    ) -> Self {
        let mut property = Self::new(name, display_name, PropertyType::FixedCollection);
        property.placeholder = Some(placeholder);
        property.type_options_mut().multiple_values = true;
        property.options = PropertyOptions::Groups(groups);
        property
    }

    pub fn default(mut self, value: Value) -> Self {
        self.default = value;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn no_data_expression(mut self) -> Self {
        self.no_data_expression = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.type_options_mut().rows = Some(rows);
        self
    }

    pub fn min_value(mut self, min: i64) -> Self {
        self.type_options_mut().min_value = Some(min);
        self
    }

    /// Show only for the given resources and (when non-empty) operations
    pub fn show_for(mut self, resources: &[Resource], operations: &[Operation]) -> Self {
        let show = &mut self.display_options.get_or_insert_with(Default::default).show;
        show.insert(
            "resource".to_string(),
            resources.iter().map(|r| json!(r.as_str())).collect(),
        );
        if !operations.is_empty() {
            show.insert(
                "operation".to_string(),
                operations.iter().map(|o| json!(o.as_str())).collect(),
            );
        }
        self
    }

    /// Show only while another parameter holds one of `values`
    pub fn show_when(mut self, parameter: &str, values: Vec<Value>) -> Self {
        self.display_options
            .get_or_insert_with(Default::default)
            .show
            .insert(parameter.to_string(), values);
        self
    }

    fn type_options_mut(&mut self) -> &mut TypeOptions {
        self.type_options.get_or_insert_with(Default::default)
    }

    pub fn load_options_method(&self) -> Option<LoadOptionsMethod> {
        self.type_options.as_ref().and_then(|t| t.load_options_method)
    }

    pub fn is_visible_for(&self, resource: Resource, operation: Operation) -> bool {
        self.display_options
            .as_ref()
            .map(|d| d.admits(resource, operation))
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRef {
    pub name: &'static str,
    pub required: bool,
}

/// Top-level node description handed to the host
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub group: Vec<&'static str>,
    pub version: u32,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub defaults: BTreeMap<&'static str, &'static str>,
    pub inputs: Vec<&'static str>,
    pub outputs: Vec<&'static str>,
    pub credentials: Vec<CredentialRef>,
    pub properties: Vec<NodeProperty>,
}

impl NodeDescription {
    /// Visible top-level property with this name for a resource/operation
    pub fn property(
        &self,
        name: &str,
        resource: Resource,
        operation: Operation,
    ) -> Option<&NodeProperty> {
        self.properties
            .iter()
            .find(|p| p.name == name && p.is_visible_for(resource, operation))
    }

    /// Default the host would use for a parameter left untouched
    pub fn default_value(
        &self,
        name: &str,
        resource: Resource,
        operation: Operation,
    ) -> Option<Value> {
        self.property(name, resource, operation)
            .map(|p| p.default.clone())
    }

    /// Every loader referenced anywhere in the schema
    pub fn load_options_methods(&self) -> Vec<LoadOptionsMethod> {
        fn walk(properties: &[NodeProperty], out: &mut Vec<LoadOptionsMethod>) {
            for property in properties {
                if let Some(method) = property.load_options_method() {
                    if !out.contains(&method) {
                        out.push(method);
                    }
                }
                match &property.options {
                    PropertyOptions::Fields(fields) => walk(fields, out),
                    PropertyOptions::Groups(groups) => {
                        for group in groups {
                            walk(&group.values, out);
                        }
                    }
                    _ => {}
                }
            }
        }
        let mut methods = Vec::new();
        walk(&self.properties, &mut methods);
        methods
    }
}

fn resource_picker() -> NodeProperty {
    NodeProperty::choice(
        "resource",
        "Resource",
        vec![
            PropertyOption::new("Article", Resource::Article.as_str()),
            PropertyOption::new("Category", Resource::Category.as_str()),
            PropertyOption::new("Custom Field", Resource::Field.as_str()),
            PropertyOption::new("Media", Resource::Media.as_str()),
            PropertyOption::new("Tag", Resource::Tag.as_str()),
        ],
    )
    .default(json!(Resource::Article.as_str()))
    .no_data_expression()
}

/// Operation picker for a resource; `choices` are (operation, description, action)
pub(crate) fn operation_picker(
    resource: Resource,
    choices: &[(Operation, &str, &str)],
) -> NodeProperty {
    NodeProperty::choice(
        "operation",
        "Operation",
        choices
            .iter()
            .map(|(op, description, action)| {
                PropertyOption::new(op.display_name(), op.as_str())
                    .describe(*description)
                    .action(*action)
            })
            .collect(),
    )
    .default(json!(resource.default_operation().as_str()))
    .no_data_expression()
    .show_for(&[resource], &[])
}

/// `returnAll` / `limit` pair shared by every getAll operation
pub(crate) fn listing_properties(resource: Resource) -> Vec<NodeProperty> {
    vec![
        NodeProperty::boolean("returnAll", "Return All")
            .show_for(&[resource], &[Operation::GetAll])
            .describe("Whether to return all results or only up to a given limit"),
        NodeProperty::number("limit", "Limit")
            .default(json!(20))
            .min_value(1)
            .show_for(&[resource], &[Operation::GetAll])
            .show_when("returnAll", vec![json!(false)])
            .describe("Max number of results to return"),
    ]
}

/// Repeatable custom field rows, filled by the given loader
pub(crate) fn custom_fields_property(
    resource: Resource,
    operation: Operation,
    loader: LoadOptionsMethod,
    description: &'static str,
) -> NodeProperty {
    NodeProperty::fixed_collection(
        "customFields",
        "Custom Fields",
        "Add Custom Field",
        vec![FieldGroup {
            display_name: "Field",
            name: "field",
            values: vec![
                NodeProperty::loaded("fieldName", "Field Name or ID", loader)
                    .describe("The custom field to set"),
                NodeProperty::string("fieldValue", "Value").describe(
                    "Text as-is, the option value for list/radio, comma-separated values for checkboxes (e.g. \"value1,value2\"), YYYY-MM-DD for dates",
                ),
            ],
        }],
    )
    .show_for(&[resource], &[operation])
    .describe(description)
}

/// Publish state choices; `with_archived` adds the Archived state
pub(crate) fn state_choices(with_archived: bool) -> Vec<PropertyOption> {
    let mut choices = vec![
        PropertyOption::new("Published", 1),
        PropertyOption::new("Unpublished", 0),
    ];
    if with_archived {
        choices.push(PropertyOption::new("Archived", 2));
    }
    choices.push(PropertyOption::new("Trashed", -2));
    choices
}

fn build_description() -> NodeDescription {
    let mut properties = vec![resource_picker()];
    properties.extend(article::properties());
    properties.extend(category::properties());
    properties.extend(tag::properties());
    properties.extend(media::properties());
    properties.extend(field::properties());

    NodeDescription {
        display_name: "Joomla Content",
        name: "joomla",
        icon: "file:joomla.svg",
        group: vec!["transform"],
        version: 1,
        subtitle: "={{$parameter[\"operation\"] + \": \" + $parameter[\"resource\"]}}",
        description: "Manage Joomla CMS content: articles, categories, tags, media and custom fields",
        defaults: BTreeMap::from([("name", "Joomla Content")]),
        inputs: vec!["main"],
        outputs: vec!["main"],
        credentials: vec![CredentialRef {
            name: CREDENTIALS_NAME,
            required: true,
        }],
        properties,
    }
}

/// The node description, built once
pub fn description() -> &'static NodeDescription {
    static DESCRIPTION: OnceLock<NodeDescription> = OnceLock::new();
    DESCRIPTION.get_or_init(build_description)
}
