use serde_json::json;

use super::{listing_properties, operation_picker, NodeProperty, PropertyOption};
use crate::resource::options::LoadOptionsMethod;
use crate::resource::protocol::{Operation, Resource};

const TAG: Resource = Resource::Tag;

fn editable_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::string("alias", "Alias"),
        NodeProperty::string("description", "Description").rows(5),
        NodeProperty::string("language", "Language").default(json!("*")),
        NodeProperty::loaded("parent_id", "Parent Tag Name or ID", LoadOptionsMethod::GetTags)
            .describe("Leave empty to create a root-level tag"),
        NodeProperty::choice(
            "published",
            "Status",
            vec![
                PropertyOption::new("Published", 1),
                PropertyOption::new("Unpublished", 0),
            ],
        )
        .default(json!(1)),
    ]
}

pub(super) fn properties() -> Vec<NodeProperty> {
    let mut properties = vec![
        operation_picker(
            TAG,
            &[
                (Operation::Create, "Create a tag", "Create a tag"),
                (Operation::Delete, "Delete a tag", "Delete a tag"),
                (Operation::Get, "Get a tag", "Get a tag"),
                (Operation::GetAll, "Get many tags", "Get many tags"),
                (Operation::Update, "Update a tag", "Update a tag"),
            ],
        ),
        NodeProperty::number("tagId", "Tag ID")
            .required()
            .show_for(&[TAG], &[Operation::Get, Operation::Delete, Operation::Update]),
    ];
    properties.extend(listing_properties(TAG));
    properties.push(
        NodeProperty::collection(
            "filters",
            "Filters",
            "Add Filter",
            vec![
                NodeProperty::string("language", "Language"),
                NodeProperty::loaded(
                    "parent_id",
                    "Parent Tag Name or ID",
                    LoadOptionsMethod::GetTags,
                ),
                NodeProperty::string("search", "Search"),
                NodeProperty::choice(
                    "state",
                    "Status",
                    vec![
                        PropertyOption::new("All", ""),
                        PropertyOption::new("Published", "1"),
                        PropertyOption::new("Unpublished", "0"),
                    ],
                ),
            ],
        )
        .show_for(&[TAG], &[Operation::GetAll]),
    );
    properties.push(
        NodeProperty::string("title", "Title")
            .required()
            .show_for(&[TAG], &[Operation::Create]),
    );
    properties.push(
        NodeProperty::collection(
            "additionalFields",
            "Additional Fields",
            "Add Field",
            editable_fields(),
        )
            .show_for(&[TAG], &[Operation::Create]),
    );

    let mut update = editable_fields();
    update.push(NodeProperty::string("title", "Title"));
    properties.push(
        NodeProperty::collection("updateFields", "Update Fields", "Add Field", update)
            .show_for(&[TAG], &[Operation::Update]),
    );
    properties
}
