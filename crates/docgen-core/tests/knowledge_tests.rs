// Integration tests for the knowledge document pipeline
use docgen_core::dialect::SqlDialect;
use docgen_core::enums::EnumValue;
use docgen_core::error::DiagnosticKind;
use docgen_core::knowledge::KnowledgeBase;
use pretty_assertions::assert_eq;

const MAIL_STATUS_GO: &str = r#"package mail

// @ai 邮件发送状态
const (
	MailStatusPending = 0 // 待发送
	MailStatusSending = 1 // 发送中
	MailStatusSent    = 2
)
"#;

const USERS_SQL: &str = r#"
-- users
CREATE TABLE "public"."users" (
    id bigint NOT NULL,
    name character varying(50),
    CONSTRAINT users_pkey PRIMARY KEY (id)
);
COMMENT ON TABLE "public"."users" IS '用户表';
COMMENT ON COLUMN "public"."users"."name" IS '姓名';
"#;

fn knowledge(files: &[(&str, &[u8])]) -> KnowledgeBase {
    let mut kb = KnowledgeBase::new().unwrap();
    for (path, bytes) in files {
        kb.ingest_file(path, bytes).unwrap();
    }
    kb
}

#[test]
fn test_annotated_group_end_to_end() {
    let kb = knowledge(&[(
        "sample.go",
        "package p\n\n// @ai sample enum\nconst (\n\tA = 1 // one\n\tB = 2 // two\n)\n".as_bytes(),
    )]);

    let group = kb.enums().get("A sample enum").unwrap();
    let members: Vec<_> = group
        .members
        .iter()
        .map(|m| (m.name.as_str(), m.value.to_string(), m.comment.as_str()))
        .collect();
    assert_eq!(
        members,
        vec![("A", "1".to_string(), "one"), ("B", "2".to_string(), "two")]
    );
}

#[test]
fn test_same_line_comment_beats_group_description() {
    let kb = knowledge(&[("mail/status.go", MAIL_STATUS_GO.as_bytes())]);
    let group = kb.enums().get("MailStatus 邮件发送状态").unwrap();

    assert_eq!(group.member("MailStatusPending").unwrap().comment, "待发送");
    assert_eq!(group.member("MailStatusSending").unwrap().comment, "发送中");
    assert_eq!(group.member("MailStatusSent").unwrap().comment, "邮件发送状态");
    assert_eq!(
        group.member("MailStatusSent").unwrap().value,
        EnumValue::Literal("2".to_string())
    );
}

#[test]
fn test_sql_table_with_comments() {
    let kb = knowledge(&[("db/schema.sql", USERS_SQL.as_bytes())]);
    let users = kb.catalog().get_table("users").unwrap();

    assert_eq!(users.comment.as_deref(), Some("用户表"));
    let columns: Vec<_> = users
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.data_type.as_str(), c.comment.as_deref()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("id", "bigint", None),
            ("name", "character varying(50)", Some("姓名")),
        ]
    );
    assert!(kb.diagnostics().is_empty());
}

#[test]
fn test_comment_file_before_create_file() {
    let kb = knowledge(&[
        ("a_comments.sql", "COMMENT ON COLUMN t.name IS 'display name';".as_bytes()),
        ("b_tables.sql", "CREATE TABLE t (id int, name text);".as_bytes()),
    ]);

    let table = kb.catalog().get_table("t").unwrap();
    assert_eq!(
        table.get_column("name").unwrap().comment.as_deref(),
        Some("display name")
    );
}

#[test]
fn test_gbk_comment_payload() {
    let mut sql = b"CREATE TABLE t (id bigint, name character varying(50));\n".to_vec();
    sql.extend_from_slice(b"COMMENT ON COLUMN t.name IS '");
    sql.extend_from_slice(&[0xd0, 0xd5, 0xc3, 0xfb]);
    sql.extend_from_slice(b"';\n");

    let kb = knowledge(&[("legacy.sql", sql.as_slice())]);
    let table = kb.catalog().get_table("t").unwrap();
    assert_eq!(table.get_column("name").unwrap().comment.as_deref(), Some("姓名"));
}

#[test]
fn test_groups_merge_across_files() {
    let first = "package a\n\n// @ai 颜色\nconst (\n\tColorRed = 1 // red\n)\n";
    let second = "package b\n\n// @ai 颜色\nconst (\n\tColorRed = 9 // other\n\tColorBlue = 2 // blue\n)\n";
    let kb = knowledge(&[("a/color.go", first.as_bytes()), ("b/color.go", second.as_bytes())]);

    assert_eq!(kb.enums().len(), 1);
    let group = kb.enums().get("Color 颜色").unwrap();
    let names: Vec<_> = group.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["ColorRed", "ColorBlue"]);
    assert_eq!(group.member("ColorRed").unwrap().value.to_string(), "1");
    assert_eq!(group.file, "a/color.go");
    assert!(group.tags.contains("blue"));
}

#[test]
fn test_markdown_document() {
    let kb = knowledge(&[
        ("mail/status.go", MAIL_STATUS_GO.as_bytes()),
        ("db/schema.sql", USERS_SQL.as_bytes()),
        ("db/audit.sql", "CREATE TABLE audit_log (id bigint, payload jsonb);".as_bytes()),
    ]);

    let expected = "\
# Enumerations

## MailStatus 邮件发送状态

**Tags:** `mail` · `pending` · `sending` · `sent` · `status` · `status 邮件发送状态` · `发送中` · `待发送` · `邮件发送状态`

| Name | Value | Description |
|---|---|---|
| MailStatusPending | 0 | 待发送 |
| MailStatusSending | 1 | 发送中 |
| MailStatusSent | 2 | 邮件发送状态 |

# Database Tables

## audit_log

| Column | Type | Description |
|---|---|---|
| id | bigint | - |
| payload | jsonb | - |

## users（用户表）

| Column | Type | Description |
|---|---|---|
| id | bigint | - |
| name | character varying(50) | 姓名 |

";
    assert_eq!(kb.render(), expected);
}

#[test]
fn test_rendering_is_stable_across_runs() {
    let files: &[(&str, &[u8])] = &[
        ("mail/status.go", MAIL_STATUS_GO.as_bytes()),
        ("db/schema.sql", USERS_SQL.as_bytes()),
    ];
    let first = knowledge(files);
    let second = knowledge(files);

    assert_eq!(first.render(), second.render());
    assert_eq!(first.render(), first.render());
    assert_eq!(first.render_json().unwrap(), second.render_json().unwrap());
}

#[test]
fn test_malformed_statements_are_reported() {
    let kb = knowledge(&[(
        "bad.sql",
        "CREATE TABLE t (id int);\nCOMMENT ON COLUMN t.id 'no is';\n".as_bytes(),
    )]);

    let kinds: Vec<_> = kb.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::MalformedComment]);
    assert_eq!(kb.diagnostics()[0].file.as_deref(), Some("bad.sql"));
    assert!(kb.catalog().table_exists("t"));
}

#[test]
fn test_orphan_column_comment_leaves_placeholder_table() {
    let kb = knowledge(&[(
        "orphans.sql",
        "COMMENT ON COLUMN ghost.id IS 'never created';\nCREATE TABLE t (id int);".as_bytes(),
    )]);

    let (enums, catalog, diagnostics) = kb.finish();
    assert!(enums.is_empty());
    assert_eq!(catalog.len(), 2);
    assert!(catalog.get_table("ghost").unwrap().columns.is_empty());
    assert!(catalog.get_table("t").unwrap().columns[0].comment.is_none());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_mysql_dialect() {
    let mut kb = KnowledgeBase::with_dialect(SqlDialect::MySQL).unwrap();
    kb.ingest_file(
        "mysql.sql",
        b"CREATE TABLE `orders` (\n  `id` int unsigned NOT NULL,\n  KEY `idx_id` (`id`)\n);\nCOMMENT ON COLUMN orders.id IS \"order id\";\n",
    )
    .unwrap();

    let orders = kb.catalog().get_table("orders").unwrap();
    assert_eq!(orders.column_names(), vec!["id"]);
    assert_eq!(orders.columns[0].data_type, "int unsigned");
    assert_eq!(orders.columns[0].comment.as_deref(), Some("order id"));
}
