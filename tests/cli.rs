mod common;

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{ORDERS_CSV, TestWorkspace, USERS_JSON};
use predicates::prelude::*;
use predicates::str::contains;
use schema_tools::schema::{ColumnType, Schema};

#[test]
fn analyze_prints_recommended_structure() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("users.json", USERS_JSON);

    cargo_bin_cmd!("schema-tools")
        .args(["analyze", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("| Column | Type    | Length | Precision | SQL Definition |"))
        .stdout(contains("| price  | decimal | N/A    | 2         | DECIMAL(10,2)  |"))
        .stdout(contains("| name   | varchar | 50     | N/A       | VARCHAR(50)    |"))
        .stdout(contains("| tags   | json    | N/A    | N/A       | JSON           |"));
}

#[test]
fn analyze_saves_schema_for_later_generation() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("orders.csv", ORDERS_CSV);
    let schema_path = workspace.path().join("orders-schema.yml");

    cargo_bin_cmd!("schema-tools")
        .args([
            "analyze",
            "-i",
            input.to_str().unwrap(),
            "-o",
            schema_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let schema = Schema::load(&schema_path).expect("load saved schema");
    assert_eq!(schema.len(), 4);
    assert_eq!(schema.column("score").unwrap().column_type, ColumnType::Float);

    cargo_bin_cmd!("schema-tools")
        .args([
            "sql",
            "--schema",
            schema_path.to_str().unwrap(),
            "-t",
            "orders",
        ])
        .assert()
        .success()
        .stdout(contains("CREATE TABLE `orders` ("))
        .stdout(contains("`score` FLOAT(3),"))
        .stdout(contains("`placed_on` DATE,"))
        .stdout(contains("`updated_at` TIMESTAMP NULL DEFAULT NULL\n);"));
}

#[test]
fn sql_writes_requested_dialect_to_file() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("users.json", USERS_JSON);
    let output = workspace.path().join("out").join("users.sql");

    cargo_bin_cmd!("schema-tools")
        .args([
            "sql",
            "-i",
            input.to_str().unwrap(),
            "-t",
            "users",
            "--dialect",
            "postgres",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let sql = fs::read_to_string(&output).expect("read sql");
    assert!(sql.starts_with("CREATE TABLE \"users\" (\n"));
    assert!(sql.contains("\"id\" INTEGER,"));
    assert!(sql.contains("\"tags\" JSONB,"));
    assert!(sql.contains("\"email\" VARCHAR(50),"));
}

#[test]
fn generate_writes_migration_sql_and_model() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("order_items.json", USERS_JSON);
    let database_dir = workspace.path().join("database");
    let models_dir = workspace.path().join("models");

    cargo_bin_cmd!("schema-tools")
        .args([
            "generate",
            "-i",
            input.to_str().unwrap(),
            "--database-dir",
            database_dir.to_str().unwrap(),
            "--models-dir",
            models_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let migrations = workspace.files_in("database/migrations");
    assert_eq!(migrations.len(), 1);
    assert!(migrations[0].ends_with("_create_order_items_table.php"));
    let migration = workspace.read(&format!("database/migrations/{}", migrations[0]));
    assert!(migration.contains("Schema::create('order_items', function (Blueprint $table) {"));
    assert!(migration.contains("$table->decimal('price', 10, 2);"));
    assert!(migration.contains("$table->string('name', 50);"));
    assert!(migration.contains("Schema::dropIfExists('order_items');"));

    let raw = workspace.files_in("database/raw");
    assert_eq!(raw.len(), 3);
    for suffix in ["mysql", "postgresql", "sqlserver"] {
        assert!(
            raw.iter()
                .any(|name| name.ends_with(&format!("_create_order_items_table_{suffix}.sql"))),
            "missing {suffix} file in {raw:?}"
        );
    }
    let stamp = migrations[0].trim_end_matches("_create_order_items_table.php");
    assert!(raw.iter().all(|name| name.starts_with(stamp)));

    let model = workspace.read("models/OrderItems.php");
    assert!(model.contains("class OrderItems extends Model"));
    assert!(model.contains("protected $table = 'order_items';"));
    assert!(model.contains("'price' => 'decimal:2',"));
    assert!(model.contains("'tags' => 'array',"));
}

#[test]
fn generate_honours_explicit_names() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sample.csv", ORDERS_CSV);

    cargo_bin_cmd!("schema-tools")
        .current_dir(workspace.path())
        .args([
            "generate",
            "-i",
            input.to_str().unwrap(),
            "-t",
            "orders",
            "-n",
            "Order",
        ])
        .assert()
        .success();

    assert!(workspace.path().join("app/Models/Order.php").exists());
    let migrations = workspace.files_in("database/migrations");
    assert!(migrations[0].ends_with("_create_orders_table.php"));
}

#[test]
fn migration_and_model_commands_use_saved_schema() {
    let workspace = TestWorkspace::new();
    let schema_path = workspace.write(
        "products.yml",
        "columns:\n- name: title\n  type: varchar\n  length: 120\n- name: price\n  type: decimal\n  precision: 2\n- name: active\n  type: boolean\n",
    );

    cargo_bin_cmd!("schema-tools")
        .current_dir(workspace.path())
        .args([
            "migration",
            "--schema",
            schema_path.to_str().unwrap(),
            "-t",
            "products",
            "--class",
            "CreateCatalogProducts",
        ])
        .assert()
        .success();
    let migrations = workspace.files_in("database/migrations");
    let migration = workspace.read(&format!("database/migrations/{}", migrations[0]));
    assert!(migration.contains("// CreateCatalogProducts"));
    assert!(migration.contains("$table->string('title', 120);"));
    assert!(migration.contains("$table->string('active');"));

    cargo_bin_cmd!("schema-tools")
        .current_dir(workspace.path())
        .args([
            "model",
            "--schema",
            schema_path.to_str().unwrap(),
            "-n",
            "Product",
        ])
        .assert()
        .success();
    let model = workspace.read("app/Models/Product.php");
    assert!(model.contains("protected $table = 'products';"));
    assert!(model.contains(" * @property float $price\n"));
}

#[test]
fn env_convert_round_trips_settings() {
    let workspace = TestWorkspace::new();
    workspace.write(
        "azure-settings.json",
        r#"[
            {"name": "APP_NAME", "value": "My App", "slotSetting": false},
            {"name": "APP_DEBUG", "value": false, "slotSetting": false},
            {"name": "DB_HOST", "value": "db.internal", "slotSetting": true}
        ]"#,
    );

    cargo_bin_cmd!("schema-tools")
        .current_dir(workspace.path())
        .args(["env-convert", "azure-to-env"])
        .assert()
        .success();
    let env = workspace.read(".env");
    assert!(env.contains("# Source file: azure-settings.json\n"));
    assert!(env.contains("APP_NAME=\"My App\"\n"));
    assert!(env.contains("APP_DEBUG=false\n"));
    assert!(env.contains("DB_HOST=db.internal\n"));

    cargo_bin_cmd!("schema-tools")
        .current_dir(workspace.path())
        .args(["env-convert", "env-to-azure", "--azure-file", "roundtrip.json"])
        .assert()
        .success();
    let settings: serde_json::Value =
        serde_json::from_str(&workspace.read("roundtrip.json")).expect("parse settings");
    let entries = settings.as_array().expect("array of settings");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["name"], "APP_NAME");
    assert_eq!(entries[0]["value"], "My App");
    assert_eq!(entries[1]["value"], "false");
    assert_eq!(entries[2]["slotSetting"], false);
}

#[test]
fn missing_input_fails_with_message() {
    let workspace = TestWorkspace::new();
    let missing = workspace.path().join("absent.json");

    cargo_bin_cmd!("schema-tools")
        .args(["analyze", "-i", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("file not found")));
}

#[test]
fn invalid_json_fails_with_message() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("broken.json", "{\"id\": ");

    cargo_bin_cmd!("schema-tools")
        .args(["analyze", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("invalid JSON"));
}

#[test]
fn unknown_encoding_is_rejected() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("orders.csv", ORDERS_CSV);

    cargo_bin_cmd!("schema-tools")
        .args([
            "analyze",
            "-i",
            input.to_str().unwrap(),
            "--input-encoding",
            "klingon",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown encoding 'klingon'"));
}

#[test]
fn env_convert_requires_source_file() {
    let workspace = TestWorkspace::new();

    cargo_bin_cmd!("schema-tools")
        .current_dir(workspace.path())
        .args(["env-convert", "env-to-azure"])
        .assert()
        .failure()
        .stderr(contains(".env file not found"));
}
