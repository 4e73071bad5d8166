//! Static tool, resource template and prompt tables, plus `docbro://`
//! resource URIs.

use docbro_core::{
    CoreError, DocBox, McpPrompt, McpResource, McpResourceTemplate, McpTool, PromptArgument,
    Shelf,
};
use serde_json::{Map, Value, json};

pub const JSON_MIME: &str = "application/json";
pub const URI_SCHEME: &str = "docbro://";

/// Tool names, `docbro_<entity>_<action>`.
pub mod tool_names {
    pub const PROJECT_LIST: &str = "docbro_project_list";
    pub const PROJECT_FILES: &str = "docbro_project_files";
    pub const SEARCH: &str = "docbro_search";
    pub const SHELF_LIST: &str = "docbro_shelf_list";
    pub const BOX_LIST: &str = "docbro_box_list";

    pub const EXECUTE_COMMAND: &str = "docbro_execute_command";
    pub const PROJECT_CREATE: &str = "docbro_project_create";
    pub const PROJECT_REMOVE: &str = "docbro_project_remove";
    pub const CRAWL: &str = "docbro_crawl";
    pub const SHELF_CREATE: &str = "docbro_shelf_create";
    pub const SHELF_SET_CURRENT: &str = "docbro_shelf_set_current";
    pub const BOX_CREATE: &str = "docbro_box_create";
    pub const BOX_ADD: &str = "docbro_box_add";
    pub const BOX_REMOVE: &str = "docbro_box_remove";
    pub const FILL: &str = "docbro_fill";

    /// Never listed; always refused.
    pub const SHELF_DELETE: &str = "docbro_shelf_delete";
}

use tool_names as t;

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Tools offered by the read-only server.
pub fn read_only_tools() -> Vec<McpTool> {
    vec![
        McpTool::new(
            t::PROJECT_LIST,
            "List documentation projects, optionally filtered by status",
            object_schema(
                json!({
                    "status": {"type": "string", "description": "Only projects with this status"},
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum number of projects"
                    }
                }),
                &[],
            ),
        ),
        McpTool::new(
            t::PROJECT_FILES,
            "List a project's files. File content is only returned for storage projects",
            object_schema(
                json!({
                    "project_name": {"type": "string"},
                    "file_path": {
                        "type": "string",
                        "description": "Relative file or directory path"
                    },
                    "include_content": {"type": "boolean", "default": false}
                }),
                &["project_name"],
            ),
        ),
        McpTool::new(
            t::SEARCH,
            "Search indexed documentation across projects",
            object_schema(
                json!({
                    "query": {"type": "string"},
                    "project_names": {"type": "array", "items": {"type": "string"}},
                    "limit": {"type": "integer", "minimum": 1, "maximum": 100, "default": 10}
                }),
                &["query"],
            ),
        ),
        McpTool::new(
            t::SHELF_LIST,
            "List shelves with their box counts and the current shelf",
            object_schema(json!({}), &[]),
        ),
        McpTool::new(
            t::BOX_LIST,
            "List boxes, optionally only those on one shelf",
            object_schema(json!({"shelf": {"type": "string"}}), &[]),
        ),
    ]
}

fn admin_only_tools() -> Vec<McpTool> {
    let crawl_limits = json!({
        "max_pages": {"type": "integer", "minimum": 1},
        "rate_limit": {"type": "number", "exclusiveMinimum": 0},
        "depth": {"type": "integer", "minimum": 1}
    });

    let mut crawl_props = json!({"name": {"type": "string"}});
    merge(&mut crawl_props, &crawl_limits);

    let mut fill_props = json!({
        "box_name": {"type": "string"},
        "source": {"type": "string", "description": "URL, directory or file to fill the box from"},
        "shelf": {"type": "string"}
    });
    merge(&mut fill_props, &crawl_limits);

    vec![
        McpTool::new(
            t::EXECUTE_COMMAND,
            "Run an allow-listed DocBro CLI command (project, crawl, setup, health, upload)",
            object_schema(
                json!({
                    "command": {
                        "type": "string",
                        "enum": ["project", "crawl", "setup", "health", "upload"]
                    },
                    "arguments": {"type": "array", "items": {"type": "string"}},
                    "options": {
                        "type": "object",
                        "additionalProperties": {"type": ["string", "integer", "number", "boolean"]}
                    },
                    "timeout": {"type": "integer", "minimum": 1, "maximum": 300, "default": 30}
                }),
                &["command"],
            ),
        ),
        McpTool::new(
            t::PROJECT_CREATE,
            "Create a documentation project",
            object_schema(
                json!({
                    "name": {"type": "string"},
                    "project_type": {"type": "string", "enum": ["crawling", "data", "storage"]},
                    "description": {"type": "string"}
                }),
                &["name", "project_type"],
            ),
        ),
        McpTool::new(
            t::PROJECT_REMOVE,
            "Remove a single documentation project",
            object_schema(
                json!({
                    "name": {"type": "string"},
                    "confirm": {"type": "boolean", "default": false}
                }),
                &["name"],
            ),
        ),
        McpTool::new(
            t::CRAWL,
            "Crawl a project's documentation source",
            object_schema(crawl_props, &["name"]),
        ),
        McpTool::new(
            t::SHELF_CREATE,
            "Create a shelf",
            object_schema(
                json!({
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "set_current": {"type": "boolean", "default": false}
                }),
                &["name"],
            ),
        ),
        McpTool::new(
            t::SHELF_SET_CURRENT,
            "Make a shelf the current shelf",
            object_schema(json!({"shelf_name": {"type": "string"}}), &["shelf_name"]),
        ),
        McpTool::new(
            t::BOX_CREATE,
            "Create a box (drag: crawled docs, rag: ingested documents, bag: stored files)",
            object_schema(
                json!({
                    "name": {"type": "string"},
                    "box_type": {"type": "string", "enum": ["drag", "rag", "bag"]},
                    "shelf": {"type": "string"},
                    "description": {"type": "string"}
                }),
                &["name", "box_type"],
            ),
        ),
        McpTool::new(
            t::BOX_ADD,
            "Add a box to a shelf",
            object_schema(
                json!({"box_name": {"type": "string"}, "shelf_name": {"type": "string"}}),
                &["box_name", "shelf_name"],
            ),
        ),
        McpTool::new(
            t::BOX_REMOVE,
            "Remove a box from a shelf",
            object_schema(
                json!({"box_name": {"type": "string"}, "shelf_name": {"type": "string"}}),
                &["box_name", "shelf_name"],
            ),
        ),
        McpTool::new(
            t::FILL,
            "Fill a box with content from a source",
            object_schema(fill_props, &["box_name", "source"]),
        ),
    ]
}

/// Tools offered by the admin server: everything read-only plus mutations.
pub fn admin_tools() -> Vec<McpTool> {
    let mut tools = read_only_tools();
    tools.extend(admin_only_tools());
    tools
}

fn merge(target: &mut Value, extra: &Value) {
    if let (Some(target), Some(extra)) = (target.as_object_mut(), extra.as_object()) {
        target.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

pub fn resource_templates() -> Vec<McpResourceTemplate> {
    vec![
        McpResourceTemplate {
            uri_template: format!("{URI_SCHEME}shelf/{{name}}"),
            name: "Shelf".to_string(),
            description: "A shelf and the boxes on it".to_string(),
            mime_type: JSON_MIME.to_string(),
        },
        McpResourceTemplate {
            uri_template: format!("{URI_SCHEME}box/{{name}}"),
            name: "Box".to_string(),
            description: "A documentation box".to_string(),
            mime_type: JSON_MIME.to_string(),
        },
    ]
}

pub fn shelf_resource(shelf: &Shelf) -> McpResource {
    let current = if shelf.is_current { " (current)" } else { "" };
    McpResource {
        uri: ResourceUri::Shelf(shelf.name.clone()).to_string(),
        name: shelf.name.clone(),
        description: format!("Shelf with {} boxes{current}", shelf.box_count()),
        mime_type: JSON_MIME.to_string(),
    }
}

pub fn box_resource(doc_box: &DocBox) -> McpResource {
    McpResource {
        uri: ResourceUri::Box(doc_box.name.clone()).to_string(),
        name: doc_box.name.clone(),
        description: doc_box
            .description
            .clone()
            .unwrap_or_else(|| format!("{} box", doc_box.box_type)),
        mime_type: JSON_MIME.to_string(),
    }
}

/// A parsed `docbro://shelf/{name}` or `docbro://box/{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Shelf(String),
    Box(String),
}

impl ResourceUri {
    pub fn parse(uri: &str) -> Result<Self, CoreError> {
        let rest = uri
            .strip_prefix(URI_SCHEME)
            .ok_or_else(|| CoreError::Validation(format!("Unsupported resource URI: {uri}")))?;
        let (kind, name) = rest
            .split_once('/')
            .ok_or_else(|| CoreError::Validation(format!("Malformed resource URI: {uri}")))?;
        let name = urlencoding::decode(name)
            .map_err(|_| CoreError::Validation(format!("Malformed resource URI: {uri}")))?
            .into_owned();
        if name.is_empty() || name.contains('/') {
            return Err(CoreError::Validation(format!("Malformed resource URI: {uri}")));
        }
        match kind {
            "shelf" => Ok(Self::Shelf(name)),
            "box" => Ok(Self::Box(name)),
            other => Err(CoreError::Validation(format!("Unknown resource kind: {other}"))),
        }
    }
}

impl std::fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shelf(name) => write!(f, "{URI_SCHEME}shelf/{}", urlencoding::encode(name)),
            Self::Box(name) => write!(f, "{URI_SCHEME}box/{}", urlencoding::encode(name)),
        }
    }
}

pub const PROMPT_SEARCH_DOCS: &str = "docbro_search_docs";
pub const PROMPT_EXPLORE_SHELF: &str = "docbro_explore_shelf";

pub fn prompts() -> Vec<McpPrompt> {
    vec![
        McpPrompt {
            name: PROMPT_SEARCH_DOCS.to_string(),
            description: "Answer a question from indexed documentation".to_string(),
            arguments: vec![
                PromptArgument::required("query", "What to look up"),
                PromptArgument::optional("project", "Restrict the search to one project"),
            ],
        },
        McpPrompt {
            name: PROMPT_EXPLORE_SHELF.to_string(),
            description: "Summarise the boxes on a shelf".to_string(),
            arguments: vec![PromptArgument::required("shelf", "Shelf to explore")],
        },
    ]
}

/// Render a prompt into an MCP `prompts/get` result.
pub fn render_prompt(name: &str, arguments: &Map<String, Value>) -> Result<Value, CoreError> {
    let prompt = prompts()
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| CoreError::Validation(format!("Unknown prompt: {name}")))?;

    let arg = |key: &str| arguments.get(key).and_then(Value::as_str).map(str::trim);
    if let Some(missing) = prompt
        .arguments
        .iter()
        .find(|a| a.required && arg(&a.name).is_none_or(str::is_empty))
    {
        return Err(CoreError::Validation(format!(
            "Missing required prompt argument: {}",
            missing.name
        )));
    }

    let text = match name {
        PROMPT_SEARCH_DOCS => {
            let query = arg("query").unwrap_or_default();
            match arg("project").filter(|p| !p.is_empty()) {
                Some(project) => format!(
                    "Use the {} tool with project_names [\"{project}\"] \
                     to find documentation about: {query}. \
                     Cite the URLs of the results you rely on.",
                    t::SEARCH
                ),
                None => format!(
                    "Use the {} tool to find documentation about: {query}. \
                     Cite the URLs of the results you rely on.",
                    t::SEARCH
                ),
            }
        }
        _ => {
            let shelf = arg("shelf").unwrap_or_default();
            format!(
                "Read the resource {} and summarise what each box on the shelf covers. \
                 Use {} with shelf \"{shelf}\" for box details.",
                ResourceUri::Shelf(shelf.to_string()),
                t::BOX_LIST
            )
        }
    };

    Ok(json!({
        "description": prompt.description,
        "messages": [{
            "role": "user",
            "content": {"type": "text", "text": text}
        }]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tools: &[McpTool]) -> Vec<&str> {
        tools.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn read_only_catalog_has_no_mutations() {
        let tools = read_only_tools();
        let names = names(&tools);
        for expected in [t::SHELF_LIST, t::BOX_LIST, t::SEARCH] {
            assert!(names.contains(&expected));
        }
        for absent in [t::SHELF_CREATE, t::EXECUTE_COMMAND, t::SHELF_DELETE] {
            assert!(!names.contains(&absent));
        }
    }

    #[test]
    fn admin_catalog_is_a_superset_without_delete() {
        let tools = admin_tools();
        let names = names(&tools);
        for expected in [
            t::SHELF_LIST,
            t::SHELF_CREATE,
            t::BOX_CREATE,
            t::FILL,
            t::EXECUTE_COMMAND,
        ] {
            assert!(names.contains(&expected));
        }
        assert!(!names.contains(&t::SHELF_DELETE));
        assert!(tools.iter().all(|t| t.input_schema["type"] == "object"));
    }

    #[test]
    fn resource_uris_round_trip() {
        assert_eq!(
            ResourceUri::parse("docbro://shelf/rust docs").unwrap(),
            ResourceUri::Shelf("rust docs".into())
        );
        assert_eq!(
            ResourceUri::parse("docbro://box/tokio%20guide").unwrap(),
            ResourceUri::Box("tokio guide".into())
        );
        assert_eq!(ResourceUri::Box("x".into()).to_string(), "docbro://box/x");
        for bad in [
            "http://x",
            "docbro://shelf/",
            "docbro://crate/x",
            "docbro://shelf",
            "docbro://box/a/b",
            "docbro://box/a%2Fb",
        ] {
            assert!(ResourceUri::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn resource_uris_are_percent_encoded() {
        let shelf = ResourceUri::Shelf("rust docs".into());
        let uri = shelf.to_string();
        assert_eq!(uri, "docbro://shelf/rust%20docs");
        assert_eq!(ResourceUri::parse(&uri).unwrap(), shelf);

        let listed = shelf_resource(&Shelf {
            name: "rust docs".into(),
            description: None,
            is_current: false,
            box_names: Vec::new(),
        });
        assert!(!listed.uri.contains(' '));
    }

    #[test]
    fn prompts_require_arguments() {
        let mut args = Map::new();
        assert!(render_prompt(PROMPT_SEARCH_DOCS, &args).is_err());

        args.insert("query".into(), json!("spawn_blocking"));
        args.insert("project".into(), json!("tokio"));
        let rendered = render_prompt(PROMPT_SEARCH_DOCS, &args).unwrap();
        let text = rendered["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("spawn_blocking"));
        assert!(text.contains("tokio"));

        assert!(render_prompt("nope", &args).is_err());
    }
}
