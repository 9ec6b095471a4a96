use serde_json::json;

use super::{
    custom_fields_property, listing_properties, operation_picker, state_choices, NodeProperty,
    PropertyOption,
};
use crate::resource::options::LoadOptionsMethod;
use crate::resource::protocol::{Operation, Resource};

const ARTICLE: Resource = Resource::Article;

/// Members shared by the create and update collections
fn editable_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::string("alias", "Alias")
            .describe("URL-friendly version of the title. Generated from the title when empty."),
        NodeProperty::boolean("featured", "Featured"),
        NodeProperty::string("articletext", "Full Text")
            .rows(10)
            .describe("Full article content (HTML allowed)"),
        NodeProperty::string("introtext", "Intro Text")
            .rows(5)
            .describe("Introduction text shown in blog and list views"),
        NodeProperty::string("language", "Language").default(json!("*")),
        NodeProperty::string("metadesc", "Meta Description"),
        NodeProperty::string("metakey", "Meta Keywords").describe("Comma-separated keywords"),
        NodeProperty::choice("state", "Status", state_choices(true)).default(json!(1)),
        NodeProperty::json("images", "Images").describe(
            "Intro and full text images, e.g. {\"image_intro\": \"images/sample.jpg\"}",
        ),
    ]
}

pub(super) fn properties() -> Vec<NodeProperty> {
    let mut properties = vec![
        operation_picker(
            ARTICLE,
            &[
                (Operation::Create, "Create an article", "Create an article"),
                (Operation::Delete, "Delete an article", "Delete an article"),
                (Operation::Get, "Get an article", "Get an article"),
                (Operation::GetAll, "Get many articles", "Get many articles"),
                (Operation::Update, "Update an article", "Update an article"),
            ],
        ),
        NodeProperty::number("articleId", "Article ID")
            .required()
            .show_for(&[ARTICLE], &[Operation::Get, Operation::Delete, Operation::Update])
            .describe("The ID of the article"),
    ];
    properties.extend(listing_properties(ARTICLE));
    properties.push(
        NodeProperty::collection(
            "filters",
            "Filters",
            "Add Filter",
            vec![
                NodeProperty::loaded(
                    "catid",
                    "Category Name or ID",
                    LoadOptionsMethod::GetCategories,
                ),
                NodeProperty::choice(
                    "featured",
                    "Featured",
                    vec![
                        PropertyOption::new("All", ""),
                        PropertyOption::new("Featured", "1"),
                        PropertyOption::new("Not Featured", "0"),
                    ],
                ),
                NodeProperty::loaded(
                    "language",
                    "Language Name or ID",
                    LoadOptionsMethod::GetLanguages,
                ),
                NodeProperty::string("search", "Search")
                    .describe("Search in title and content"),
                NodeProperty::choice(
                    "state",
                    "Status",
                    vec![
                        PropertyOption::new("All", ""),
                        PropertyOption::new("Published", "1"),
                        PropertyOption::new("Unpublished", "0"),
                        PropertyOption::new("Archived", "2"),
                        PropertyOption::new("Trashed", "-2"),
                    ],
                ),
            ],
        )
        .show_for(&[ARTICLE], &[Operation::GetAll]),
    );
    properties.push(
        NodeProperty::string("title", "Title")
            .required()
            .show_for(&[ARTICLE], &[Operation::Create])
            .describe("The title of the article"),
    );
    properties.push(
        NodeProperty::loaded("catid", "Category Name or ID", LoadOptionsMethod::GetCategories)
            .required()
            .show_for(&[ARTICLE], &[Operation::Create])
            .describe("The category the article belongs to"),
    );
    properties.push(
        NodeProperty::collection(
            "additionalFields",
            "Additional Fields",
            "Add Field",
            editable_fields(),
        )
            .show_for(&[ARTICLE], &[Operation::Create]),
    );

    let mut update = editable_fields();
    update.push(NodeProperty::loaded(
        "catid",
        "Category Name or ID",
        LoadOptionsMethod::GetCategories,
    ));
    update.push(NodeProperty::string("title", "Title"));
    update.push(
        NodeProperty::json("associations", "Associations")
            .describe("Language associations, e.g. {\"fr-FR\": 12}"),
    );
    properties.push(
        NodeProperty::collection("updateFields", "Update Fields", "Add Field", update)
            .show_for(&[ARTICLE], &[Operation::Update]),
    );

    for operation in [Operation::Create, Operation::Update] {
        properties.push(custom_fields_property(
            ARTICLE,
            operation,
            LoadOptionsMethod::GetArticleCustomFields,
            "Values for the article's custom fields",
        ));
    }
    properties
}
