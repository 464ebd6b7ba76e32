//! Test Data Factory
//!
//! Pre-built API description documents:
//! - a small OpenAPI 3 todo API with `$ref`-ed schemas
//! - a Swagger 2 pet store with a body parameter and `definitions`
//! - a Japanese task API for compound-word queries
//! - a self-referencing tree schema for cycle handling

use std::sync::Arc;

use apiseek_core::{InMemoryCatalog, OperationCatalog};
use serde_json::{json, Value};

/// OpenAPI 3 todo API: list, create and fetch todos
pub fn todo_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": { "title": "Todo API", "version": "1.0.0" },
        "paths": {
            "/todos": {
                "get": {
                    "operationId": "listTodos",
                    "summary": "List todos",
                    "responses": { "200": {
                        "description": "A list of todos",
                        "content": { "application/json": { "schema": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Todo" }
                        } } }
                    } }
                },
                "post": {
                    "operationId": "createTodo",
                    "summary": "Create a todo",
                    "description": "Adds a new item to the list of things to do.",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": {
                            "schema": { "$ref": "#/components/schemas/NewTodo" }
                        } }
                    },
                    "responses": { "201": { "description": "Created" } }
                }
            },
            "/todos/{id}": {
                "get": {
                    "operationId": "getTodo",
                    "summary": "Get a todo by id",
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
                    ],
                    "responses": { "200": {
                        "description": "The todo",
                        "content": { "application/json": {
                            "schema": { "$ref": "#/components/schemas/Todo" }
                        } }
                    } }
                }
            }
        },
        "components": { "schemas": {
            "NewTodo": {
                "type": "object",
                "required": ["title"],
                "properties": {
                    "title": { "type": "string" },
                    "done": { "type": "boolean" }
                }
            },
            "Todo": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "title": { "type": "string" },
                    "done": { "type": "boolean" }
                }
            }
        } }
    })
}

/// Swagger 2 pet store: body parameter, `definitions`, a delete operation
pub fn petstore_document() -> Value {
    json!({
        "swagger": "2.0",
        "info": { "title": "Pet Store", "version": "1.0.0" },
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "summary": "List all pets",
                    "responses": { "200": {
                        "description": "Pets",
                        "schema": { "type": "array", "items": { "$ref": "#/definitions/Pet" } }
                    } }
                },
                "post": {
                    "operationId": "addPet",
                    "summary": "Add a pet to the store",
                    "parameters": [
                        { "name": "pet", "in": "body", "required": true,
                          "schema": { "$ref": "#/definitions/Pet" } }
                    ],
                    "responses": { "201": { "description": "Created" } }
                }
            },
            "/pets/{petId}": {
                "parameters": [
                    { "name": "petId", "in": "path", "required": true, "type": "string" }
                ],
                "delete": {
                    "operationId": "deletePet",
                    "summary": "Remove a pet",
                    "responses": { "204": { "description": "Deleted" } }
                }
            }
        },
        "definitions": {
            "Pet": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "species": { "type": "string" },
                    "vaccinationDate": { "type": "string", "format": "date" }
                }
            }
        }
    })
}

/// Japanese task API; summaries keep their roots as separate words
pub fn japanese_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": { "title": "タスク API", "version": "1.0.0" },
        "paths": {
            "/tasks": {
                "get": { "operationId": "listTasks", "summary": "タスク 一覧" },
                "post": { "operationId": "createTask", "summary": "タスク 作成" }
            },
            "/tasks/{taskId}": {
                "delete": { "operationId": "deleteTask", "summary": "タスク 削除" }
            }
        }
    })
}

/// A schema that refers to itself through `children`
pub fn tree_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": { "title": "Tree API", "version": "1.0.0" },
        "paths": {
            "/nodes": {
                "post": {
                    "operationId": "createNode",
                    "summary": "Create a tree node",
                    "requestBody": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/Node" }
                    } } }
                }
            }
        },
        "components": { "schemas": {
            "Node": {
                "type": "object",
                "properties": {
                    "label": { "type": "string" },
                    "children": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/Node" }
                    }
                }
            }
        } }
    })
}

/// Build a catalog from named documents
pub fn catalog<'a, I>(documents: I) -> Arc<dyn OperationCatalog>
where
    I: IntoIterator<Item = (&'a str, Value)>,
{
    Arc::new(InMemoryCatalog::from_documents(documents).expect("fixture documents are valid"))
}

/// Catalog holding only the todo API
pub fn todo_catalog() -> Arc<dyn OperationCatalog> {
    catalog([("todo", todo_document())])
}

/// Catalog holding the todo API and the pet store
pub fn mixed_catalog() -> Arc<dyn OperationCatalog> {
    catalog([("petstore", petstore_document()), ("todo", todo_document())])
}
