//! CLI integration tests for the currency-directive binary.

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// Nothing listens here, so any accidental lookup fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:1";

const RESULT_PAGE: &str = r#"<div><span class="DFlfde SwHCTb iBp4i">127.10 United States Dollar</span></div>"#;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("currency-directive"))
}

// Helper to create a temp file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn user_schema(ty: &str, from: &str, to: &str) -> String {
    format!(
        r#"{{
            "types": {{
                "Query": {{ "fields": {{ "user": {{ "type": "User" }} }} }},
                "User": {{
                    "fields": {{
                        "name": {{ "type": "String" }},
                        "amount": {{
                            "type": "{ty}",
                            "directives": [{{ "name": "currency", "arguments": {{ "from": "{from}", "to": "{to}" }} }}]
                        }}
                    }}
                }}
            }}
        }}"#
    )
}

mod typedefs_command {
    use super::*;

    #[test]
    fn prints_directive_and_enum() {
        cmd()
            .arg("typedefs")
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "directive @currency(from: String!, to: String!) on FIELD_DEFINITION\n",
            ))
            .stdout(predicate::str::contains("enum CurrencyCode {\n  AED\n"))
            .stdout(predicate::str::contains("  GBP\n"))
            .stdout(predicate::str::contains("  ZMW\n}"));
    }

    #[test]
    fn custom_directive_name() {
        cmd()
            .args(["typedefs", "--directive", "money"])
            .assert()
            .success()
            .stdout(predicate::str::contains("directive @money("));
    }
}

mod codes_command {
    use super::*;

    #[test]
    fn text_output() {
        cmd()
            .arg("codes")
            .assert()
            .success()
            .stdout(predicate::str::contains("GBP  British Pound"))
            .stdout(predicate::str::contains("USD  US Dollar"));
    }

    #[test]
    fn json_output() {
        let output = cmd().args(["codes", "--json"]).output().unwrap();
        assert!(output.status.success());

        let codes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(codes["EUR"], "Euro");
        assert_eq!(
            codes.as_object().unwrap().len(),
            currency_directive::CURRENCY_CODES.len()
        );
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn clean_schema_passes() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", &user_schema("Float", "GBP", "USD"));

        cmd()
            .args(["lint", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "1 annotated field(s) checked: 0 error(s), 0 warning(s)",
            ));
    }

    #[test]
    fn invalid_codes_fail() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", &user_schema("Float", "BLAH", "HMMMM"));

        cmd()
            .args(["lint", schema.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E001"))
            .stdout(predicate::str::contains("User.amount"))
            .stdout(predicate::str::contains("Currency codes: BLAH,HMMMM are not valid!"));
    }

    #[test]
    fn unsupported_type_fails() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", &user_schema("User", "GBP", "USD"));

        cmd()
            .args(["lint", schema.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E002"));
    }

    #[test]
    fn json_format() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", &user_schema("Float", "GBP", "ZZZ"));

        let output = cmd()
            .args(["lint", schema.to_str().unwrap(), "--format", "json"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["errors"], 1);
        assert_eq!(result["diagnostics"][0]["code"], "E001");
        assert_eq!(result["diagnostics"][0]["severity"], "error");
    }

    #[test]
    fn strict_fails_on_warnings() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{ "types": { "Query": { "fields": { "amount": {
                "type": "Float",
                "directives": [{ "name": "currency", "arguments": "GBP" }]
            } } } } }"#,
        );

        cmd()
            .args(["lint", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("W001"));

        cmd()
            .args(["lint", schema.to_str().unwrap(), "--strict"])
            .assert()
            .code(1);
    }

    #[test]
    fn missing_file() {
        cmd()
            .args(["lint", "/nonexistent/schema.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", "{ not json");

        cmd()
            .args(["lint", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }
}

mod convert_command {
    use super::*;

    #[test]
    fn prints_converted_amount() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "100 GBP to USD ".into()))
            .with_body(RESULT_PAGE)
            .expect(1)
            .create();

        cmd()
            .args([
                "convert",
                "100",
                "--from",
                "GBP",
                "--to",
                "USD",
                "--base-url",
                &server.url(),
            ])
            .assert()
            .success()
            .stdout("127.10\n");

        mock.assert();
    }

    #[test]
    fn invalid_code_fails_without_request() {
        cmd()
            .args([
                "convert",
                "100",
                "--from",
                "GBP",
                "--to",
                "ZZZ",
                "--base-url",
                UNREACHABLE,
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Currency codes: ZZZ are not valid!"));
    }

    #[test]
    fn non_finite_amount_is_rejected() {
        for amount in ["NaN", "inf", "-inf"] {
            cmd()
                .args([
                    "convert",
                    "--from",
                    "GBP",
                    "--to",
                    "USD",
                    "--base-url",
                    UNREACHABLE,
                    "--",
                    amount,
                ])
                .assert()
                .code(2)
                .stderr(predicate::str::contains("amount must be a finite number"));
        }
    }

    #[test]
    fn server_error_fails() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();

        cmd()
            .args([
                "convert",
                "100",
                "--from",
                "GBP",
                "--to",
                "USD",
                "--base-url",
                &server.url(),
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains(
                "Error converting amount 100 from GBP to USD",
            ));
    }
}

mod execute_command {
    use super::*;

    #[test]
    fn converts_annotated_field() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "100 GBP to USD ".into()))
            .with_body(RESULT_PAGE)
            .expect(1)
            .create();

        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", &user_schema("String", "GBP", "USD"));
        let root = write_temp_file(
            &dir,
            "root.json",
            r#"{ "user": { "name": "Ada", "amount": 100 } }"#,
        );

        cmd()
            .args([
                "execute",
                schema.to_str().unwrap(),
                "--root",
                root.to_str().unwrap(),
                "--base-url",
                &server.url(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"{"data":{"user":{"name":"Ada","amount":"127.10"}}}"#,
            ));

        mock.assert();
    }

    #[test]
    fn invalid_codes_reported_as_field_error() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", &user_schema("String", "BLAH", "HMMMM"));
        let root = write_temp_file(
            &dir,
            "root.json",
            r#"{ "user": { "name": "Ada", "amount": 100 } }"#,
        );

        let output = cmd()
            .args([
                "execute",
                schema.to_str().unwrap(),
                "--root",
                root.to_str().unwrap(),
                "--base-url",
                UNREACHABLE,
            ])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["data"]["user"]["name"], "Ada");
        assert_eq!(result["data"]["user"]["amount"], serde_json::Value::Null);
        assert_eq!(
            result["errors"][0]["message"],
            "Currency codes: BLAH,HMMMM are not valid!"
        );
        assert_eq!(result["errors"][0]["path"], serde_json::json!(["user", "amount"]));
    }

    #[test]
    fn unknown_type() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", &user_schema("String", "GBP", "USD"));

        cmd()
            .args([
                "execute",
                schema.to_str().unwrap(),
                "--type",
                "Mutation",
                "--base-url",
                UNREACHABLE,
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("unknown object type"));
    }

    #[test]
    fn pretty_output() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", &user_schema("String", "GBP", "USD"));

        // Empty root: the annotated field resolves to null and no lookup happens.
        cmd()
            .args([
                "execute",
                schema.to_str().unwrap(),
                "--pretty",
                "--base-url",
                UNREACHABLE,
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("{\n"));
    }
}
