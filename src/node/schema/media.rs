use serde_json::json;

use super::{operation_picker, NodeProperty};
use crate::resource::protocol::{Operation, Resource};

const MEDIA: Resource = Resource::Media;

pub(super) fn properties() -> Vec<NodeProperty> {
    vec![
        operation_picker(
            MEDIA,
            &[
                (Operation::CreateFolder, "Create a folder", "Create a folder"),
                (Operation::Delete, "Delete a file or folder", "Delete a file or folder"),
                (Operation::List, "List files and folders", "List files and folders"),
                (Operation::Upload, "Upload a file", "Upload a file"),
            ],
        ),
        // list
        NodeProperty::string("folderPath", "Folder Path")
            .default(json!("images"))
            .required()
            .show_for(&[MEDIA], &[Operation::List])
            .describe("Folder to list, relative to the media root"),
        NodeProperty::collection(
            "options",
            "Options",
            "Add Option",
            vec![NodeProperty::string("search", "Search").describe("Filter by file name")],
        )
        .show_for(&[MEDIA], &[Operation::List]),
        // upload
        NodeProperty::string("binaryPropertyName", "Input Binary Field")
            .default(json!("data"))
            .required()
            .show_for(&[MEDIA], &[Operation::Upload])
            .describe("Name of the input binary property holding the file"),
        NodeProperty::string("destinationFolder", "Destination Folder")
            .default(json!("images"))
            .required()
            .show_for(&[MEDIA], &[Operation::Upload]),
        NodeProperty::collection(
            "options",
            "Options",
            "Add Option",
            vec![NodeProperty::string("fileName", "File Name")
                .describe("Overrides the binary's own file name")],
        )
        .show_for(&[MEDIA], &[Operation::Upload]),
        // createFolder
        NodeProperty::string("parentFolder", "Parent Folder")
            .default(json!("images"))
            .required()
            .show_for(&[MEDIA], &[Operation::CreateFolder]),
        NodeProperty::string("folderName", "Folder Name")
            .required()
            .show_for(&[MEDIA], &[Operation::CreateFolder]),
        NodeProperty::collection(
            "options",
            "Options",
            "Add Option",
            vec![NodeProperty::boolean("ignoreIfExists", "Ignore If Exists")
                .default(json!(true))
                .describe("Whether to succeed when the folder already exists")],
        )
        .show_for(&[MEDIA], &[Operation::CreateFolder]),
        // delete
        NodeProperty::string("path", "Path")
            .required()
            .placeholder("images/old-file.jpg")
            .show_for(&[MEDIA], &[Operation::Delete])
            .describe("File or folder to delete, relative to the media root"),
    ]
}
