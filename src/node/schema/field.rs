use serde_json::json;

use super::{listing_properties, operation_picker, NodeProperty, PropertyOption};
use crate::resource::handlers::field::{FieldContext, FieldType, OPTIONS_TEMPLATE};
use crate::resource::protocol::{Operation, Resource};

const FIELD: Resource = Resource::Field;

fn for_types(property: NodeProperty, types: &[FieldType]) -> NodeProperty {
    property
        .show_for(&[FIELD], &[Operation::Create])
        .show_when("type", types.iter().map(|t| json!(t.as_str())).collect())
}

fn shared_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::string("default_value", "Default Value"),
        NodeProperty::string("description", "Description").rows(3),
        NodeProperty::number("group_id", "Field Group ID").describe("0 for no group"),
        NodeProperty::string("label", "Label").describe("Defaults to the title"),
        NodeProperty::string("name", "Name")
            .describe("Machine name. Generated from the title when empty."),
        NodeProperty::boolean("required", "Required"),
        NodeProperty::choice(
            "state",
            "Status",
            vec![
                PropertyOption::new("Published", 1),
                PropertyOption::new("Unpublished", 0),
                PropertyOption::new("Trashed", -2),
            ],
        )
        .default(json!(1)),
    ]
}

/// Options that only apply to one field type, each shown only for its type
fn type_options() -> Vec<NodeProperty> {
    vec![
        for_types(
            NodeProperty::json("fieldparams", "Field Options").default(json!(OPTIONS_TEMPLATE)),
            &[FieldType::List, FieldType::Radio, FieldType::Checkboxes],
        )
        .describe("Options as JSON: {\"options\": {\"options0\": {\"name\": ..., \"value\": ...}}}"),
        for_types(NodeProperty::boolean("listMultiple", "Multiple Selection"), &[FieldType::List]),
        for_types(
            NodeProperty::string("listHeader", "Header Text")
                .describe("Empty first option, e.g. \"- Select -\""),
            &[FieldType::List],
        ),
        for_types(
            NodeProperty::number("integerFirst", "First Value").default(json!(1)),
            &[FieldType::Integer],
        ),
        for_types(
            NodeProperty::number("integerLast", "Last Value").default(json!(10)),
            &[FieldType::Integer],
        ),
        for_types(
            NodeProperty::number("integerStep", "Step").default(json!(1)),
            &[FieldType::Integer],
        ),
        for_types(NodeProperty::boolean("urlRelative", "Allow Relative URLs"), &[FieldType::Url]),
        for_types(
            NodeProperty::multi_choice(
                "urlSchemes",
                "Allowed Schemes",
                ["http", "https", "ftp", "ftps", "file", "mailto"]
                    .iter()
                    .map(|s| PropertyOption::new(s.to_uppercase(), *s))
                    .collect(),
            )
            .default(json!(["http", "https"])),
            &[FieldType::Url],
        ),
        for_types(
            NodeProperty::boolean("urlShowUrl", "Show URL").default(json!(true)),
            &[FieldType::Url],
        ),
        for_types(
            NodeProperty::string("calendarFormat", "Date Format").default(json!("%Y-%m-%d")),
            &[FieldType::Calendar],
        ),
        for_types(
            NodeProperty::boolean("calendarShowtime", "Show Time"),
            &[FieldType::Calendar],
        ),
        for_types(
            NodeProperty::number("textMaxlength", "Max Length").describe("0 for no limit"),
            &[FieldType::Text],
        ),
        for_types(
            NodeProperty::number("textareaRows", "Rows").default(json!(5)),
            &[FieldType::Textarea],
        ),
        for_types(
            NodeProperty::number("textareaCols", "Columns").default(json!(50)),
            &[FieldType::Textarea],
        ),
        for_types(
            NodeProperty::number("textareaMaxlength", "Max Length").describe("0 for no limit"),
            &[FieldType::Textarea],
        ),
        for_types(
            NodeProperty::boolean("editorButtons", "Show Buttons").default(json!(true)),
            &[FieldType::Editor],
        ),
        for_types(
            NodeProperty::string("editorWidth", "Width").default(json!("100%")),
            &[FieldType::Editor],
        ),
        for_types(
            NodeProperty::string("editorHeight", "Height").default(json!("250px")),
            &[FieldType::Editor],
        ),
        for_types(
            NodeProperty::string("mediaDirectory", "Directory")
                .describe("Default folder, e.g. \"images\""),
            &[FieldType::Media],
        ),
        for_types(
            NodeProperty::choice(
                "mediaPreview",
                "Preview",
                vec![
                    PropertyOption::new("Show", "true"),
                    PropertyOption::new("Hide", "false"),
                ],
            )
            .default(json!("true")),
            &[FieldType::Media],
        ),
        for_types(
            NodeProperty::string("sqlQuery", "Query")
                .rows(4)
                .describe("Must select a value and a text column"),
            &[FieldType::Sql],
        ),
        for_types(NodeProperty::string("sqlHeader", "Header Text"), &[FieldType::Sql]),
        for_types(NodeProperty::boolean("sqlMultiple", "Multiple Selection"), &[FieldType::Sql]),
    ]
}

pub(super) fn properties() -> Vec<NodeProperty> {
    let mut properties = vec![
        operation_picker(
            FIELD,
            &[
                (Operation::Create, "Create a custom field", "Create a custom field"),
                (Operation::Delete, "Delete a custom field", "Delete a custom field"),
                (Operation::Get, "Get a custom field", "Get a custom field"),
                (Operation::GetAll, "Get many custom fields", "Get many custom fields"),
                (Operation::Update, "Update a custom field", "Update a custom field"),
            ],
        ),
        NodeProperty::choice(
            "context",
            "Context",
            vec![
                PropertyOption::new("Article", FieldContext::Article.as_str()),
                PropertyOption::new("Category", FieldContext::Category.as_str()),
            ],
        )
        .default(json!(FieldContext::Article.as_str()))
        .show_for(&[FIELD], &[])
        .describe("Which content type the field is attached to"),
        NodeProperty::number("fieldId", "Field ID")
            .required()
            .show_for(&[FIELD], &[Operation::Get, Operation::Delete, Operation::Update]),
    ];
    properties.extend(listing_properties(FIELD));
    properties.push(
        NodeProperty::string("title", "Title")
            .required()
            .show_for(&[FIELD], &[Operation::Create]),
    );
    properties.push(
        NodeProperty::choice(
            "type",
            "Type",
            FieldType::ALL
                .iter()
                .map(|t| PropertyOption::new(t.display_name(), t.as_str()))
                .collect(),
        )
        .default(json!(FieldType::Text.as_str()))
        .required()
        .show_for(&[FIELD], &[Operation::Create]),
    );
    properties.push(
        NodeProperty::collection(
            "additionalFields",
            "Additional Options",
            "Add Option",
            shared_fields(),
        )
            .show_for(&[FIELD], &[Operation::Create]),
    );
    properties.extend(type_options());

    let mut update = shared_fields();
    update.push(NodeProperty::string("title", "Title"));
    properties.push(
        NodeProperty::collection("updateFields", "Update Options", "Add Option", update)
            .show_for(&[FIELD], &[Operation::Update]),
    );
    properties
}

