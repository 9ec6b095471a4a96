use serde_json::json;

use super::{
    custom_fields_property, listing_properties, operation_picker, state_choices, NodeProperty,
};
use crate::resource::options::LoadOptionsMethod;
use crate::resource::protocol::{Operation, Resource};

const CATEGORY: Resource = Resource::Category;

fn editable_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::string("alias", "Alias"),
        NodeProperty::string("description", "Description").rows(5),
        NodeProperty::string("language", "Language").default(json!("*")),
        NodeProperty::loaded(
            "parent_id",
            "Parent Category Name or ID",
            LoadOptionsMethod::GetCategories,
        ),
        NodeProperty::choice("published", "Status", state_choices(true)).default(json!(1)),
        NodeProperty::json("associations", "Associations")
            .describe("Language associations, e.g. {\"fr-FR\": 12}"),
    ]
}

pub(super) fn properties() -> Vec<NodeProperty> {
    let mut properties = vec![
        operation_picker(
            CATEGORY,
            &[
                (Operation::Create, "Create a category", "Create a category"),
                (Operation::Delete, "Delete a category", "Delete a category"),
                (Operation::Get, "Get a category", "Get a category"),
                (Operation::GetAll, "Get many categories", "Get many categories"),
                (Operation::Update, "Update a category", "Update a category"),
            ],
        ),
        NodeProperty::number("categoryId", "Category ID")
            .required()
            .show_for(&[CATEGORY], &[Operation::Get, Operation::Delete, Operation::Update]),
    ];
    properties.extend(listing_properties(CATEGORY));
    properties.push(
        NodeProperty::collection(
            "filters",
            "Filters",
            "Add Filter",
            vec![
                NodeProperty::string("search", "Search"),
                NodeProperty::string("extension", "Extension")
                    .default(json!("com_content"))
                    .describe("Component the categories belong to"),
            ],
        )
        .show_for(&[CATEGORY], &[Operation::GetAll]),
    );
    properties.push(
        NodeProperty::string("title", "Title")
            .required()
            .show_for(&[CATEGORY], &[Operation::Create]),
    );
    properties.push(
        NodeProperty::collection(
            "additionalFields",
            "Additional Fields",
            "Add Field",
            editable_fields(),
        )
            .show_for(&[CATEGORY], &[Operation::Create]),
    );

    let mut update = editable_fields();
    update.push(NodeProperty::string("title", "Title"));
    properties.push(
        NodeProperty::collection("updateFields", "Update Fields", "Add Field", update)
            .show_for(&[CATEGORY], &[Operation::Update]),
    );

    for operation in [Operation::Create, Operation::Update] {
        properties.push(custom_fields_property(
            CATEGORY,
            operation,
            LoadOptionsMethod::GetCategoryCustomFields,
            "Values for the category's custom fields",
        ));
    }
    properties
}
