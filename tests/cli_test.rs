//! CLI integration tests for the openapi-validator binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("openapi-validator"))
}

// Helper to create a temp file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const PET_SCHEMA: &str = r#"{
    "type": "object",
    "required": ["name"],
    "properties": {
        "id": { "type": "integer", "readOnly": true },
        "name": { "type": "string" },
        "tags": { "type": "array", "items": { "type": "string" } }
    }
}"#;

const PETSTORE: &str = r#"
openapi: 3.0.3
info: { title: Petstore, version: 1.0.0 }
paths:
  /pets:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
      responses:
        201:
          description: Created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id: { type: integer, readOnly: true }
        name: { type: string }
"#;

mod validate_command {
    use super::*;

    #[test]
    fn valid_payload() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PET_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name": "Rex"}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--request",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid"));
    }

    #[test]
    fn invalid_payload_reports_location() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PET_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name": "Rex", "tags": ["a", 1]}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--request",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("at $.tags[1]: expected string, got integer"));
    }

    #[test]
    fn direction_changes_outcome() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PET_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"id": 1, "name": "Rex"}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--request",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("readOnly"));

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--response",
            ])
            .assert()
            .success();
    }

    #[test]
    fn json_output() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PET_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name": 5}"#);

        let output = cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--request",
                "--json",
            ])
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["valid"], false);
        assert_eq!(report["error"]["keyword"], "type");
        assert_eq!(report["error"]["location"], serde_json::json!(["name"]));
        assert_eq!(report["error"]["data"], 5);
    }

    #[test]
    fn pointer_into_document() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "openapi.yaml", PETSTORE);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name": "Rex"}"#);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                spec.to_str().unwrap(),
                "--pointer",
                "#/components/schemas/Pet",
                "--request",
            ])
            .assert()
            .success();
    }

    #[test]
    fn invalid_schema_exit_code() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"oneOf": "not a list"}"#);
        let payload = write_temp_file(&dir, "payload.json", "{}");

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--request",
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid schema"));
    }

    #[test]
    fn missing_schema_file() {
        let dir = TempDir::new().unwrap();
        let payload = write_temp_file(&dir, "payload.json", "{}");

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                "/nonexistent/schema.json",
                "--request",
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn direction_required() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", PET_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", "{}");

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .failure();
    }

    #[test]
    fn formats_flag() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"type": "string", "format": "uuid"}"#);
        let payload = write_temp_file(&dir, "payload.json", r#""not-a-uuid""#);

        cmd()
            .args(["validate", payload.to_str().unwrap(), "--schema", schema.to_str().unwrap(), "--request"])
            .assert()
            .code(1);

        cmd()
            .args([
                "validate",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--request",
                "--no-formats",
            ])
            .assert()
            .success();
    }
}

const TREE_SPEC: &str = r#"
openapi: 3.0.3
info: { title: Tree, version: 1.0.0 }
paths:
  /nodes:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Node'
      responses:
        default: { description: ok }
  /ping:
    post:
      requestBody:
        content:
          application/json:
            schema: { type: string }
      responses:
        default: { description: ok }
components:
  schemas:
    Node:
      type: object
      properties:
        name: { type: string }
        children:
          type: array
          items:
            $ref: '#/components/schemas/Node'
"#;

mod body_command {
    use super::*;

    #[test]
    fn recursive_document_unrelated_operation() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "tree.yaml", TREE_SPEC);
        let payload = write_temp_file(&dir, "payload.json", r#""pong""#);

        cmd()
            .args([
                "body",
                payload.to_str().unwrap(),
                "--spec",
                spec.to_str().unwrap(),
                "--path",
                "/ping",
                "--method",
                "post",
            ])
            .assert()
            .success();
    }

    #[test]
    fn recursive_document_deep_payload() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "tree.yaml", TREE_SPEC);
        let payload = write_temp_file(
            &dir,
            "payload.json",
            r#"{"name": "a", "children": [{"children": [{"children": [{"name": 7}]}]}]}"#,
        );

        cmd()
            .args([
                "body",
                payload.to_str().unwrap(),
                "--spec",
                spec.to_str().unwrap(),
                "--path",
                "/nodes",
                "--method",
                "post",
                "--log-level",
                "off",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "at $.children[0].children[0].children[0].name: expected string, got integer",
            ));
    }

    #[test]
    fn request_body() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "openapi.yaml", PETSTORE);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name": "Rex"}"#);

        cmd()
            .args([
                "body",
                payload.to_str().unwrap(),
                "--spec",
                spec.to_str().unwrap(),
                "--path",
                "/pets",
                "--method",
                "POST",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid"));
    }

    #[test]
    fn response_body() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "openapi.yaml", PETSTORE);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name": "Rex"}"#);

        cmd()
            .args([
                "body",
                payload.to_str().unwrap(),
                "--spec",
                spec.to_str().unwrap(),
                "--path",
                "/pets",
                "--method",
                "post",
                "--status",
                "201",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("required property id is missing"));
    }

    #[test]
    fn unknown_path() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "openapi.yaml", PETSTORE);
        let payload = write_temp_file(&dir, "payload.json", "{}");

        cmd()
            .args([
                "body",
                payload.to_str().unwrap(),
                "--spec",
                spec.to_str().unwrap(),
                "--path",
                "/owners",
                "--method",
                "get",
                "--json",
            ])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("no path matching /owners"));
    }

    #[test]
    fn unknown_media_type() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "openapi.yaml", PETSTORE);
        let payload = write_temp_file(&dir, "payload.json", "{}");

        cmd()
            .args([
                "body",
                payload.to_str().unwrap(),
                "--spec",
                spec.to_str().unwrap(),
                "--path",
                "/pets",
                "--method",
                "post",
                "--media-type",
                "text/plain",
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("text/plain"));
    }
}
