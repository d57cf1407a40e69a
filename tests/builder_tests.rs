use std::sync::Arc;
use serde_json::{json, Value};
use bulkwrite::core::types::Hint;
use bulkwrite::transport::mock::MockTransport;
use bulkwrite::{BulkConfig, BulkOperation, Document, ErrorKind, ExecuteOptions, Namespace};

fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

fn namespace() -> Namespace {
    Namespace::new("crm", "contacts")
}

#[tokio::test]
async fn raw_descriptors_become_wire_statements() {
    let transport = Arc::new(MockTransport::new());
    let mut bulk = BulkOperation::ordered(transport.clone(), namespace());

    bulk.raw(&json!({"insertOne": {"document": {"_id": 1, "name": "Ada"}}}))
        .unwrap()
        .raw(&json!({"updateMany": {
            "filter": {"tags": "vip"},
            "update": {"$set": {"tier.$[t]": "gold"}},
            "arrayFilters": [{"t": {"$exists": true}}],
            "collation": {"locale": "en"}
        }}))
        .unwrap()
        .raw(&json!({"replaceOne": {"filter": {"_id": 2}, "replacement": {"name": "Grace"}, "upsert": true}}))
        .unwrap()
        .raw(&json!({"deleteMany": {"filter": {"inactive": true}, "hint": "inactive_1"}}))
        .unwrap();

    assert_eq!(bulk.len(), 4);
    bulk.execute(ExecuteOptions::default()).await.unwrap();

    let commands = transport.commands();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0].payload, vec![doc(json!({"_id": 1, "name": "Ada"}))]);
    assert_eq!(
        Value::Array(commands[1].payload.iter().cloned().map(Value::Object).collect()),
        json!([
            {
                "q": {"tags": "vip"},
                "u": {"$set": {"tier.$[t]": "gold"}},
                "multi": true,
                "upsert": false,
                "arrayFilters": [{"t": {"$exists": true}}],
                "collation": {"locale": "en"}
            },
            {"q": {"_id": 2}, "u": {"name": "Grace"}, "multi": false, "upsert": true}
        ])
    );
    assert_eq!(
        Value::Object(commands[2].payload[0].clone()),
        json!({"q": {"inactive": true}, "limit": 0, "hint": "inactive_1"})
    );
}

#[tokio::test]
async fn malformed_raw_descriptor_leaves_bulk_untouched() {
    let transport = Arc::new(MockTransport::new());
    let mut bulk = BulkOperation::ordered(transport, namespace());

    let err = bulk.raw(&json!({"insertMany": {"documents": [{}]}})).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(bulk.is_empty());
}

#[test]
fn find_rejects_operator_mixing() {
    let transport = Arc::new(MockTransport::new());
    let mut bulk = BulkOperation::ordered(transport, namespace());

    let err = bulk.find(doc(json!({"_id": 1}))).update_one(json!({"name": "x"})).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidUpdate);

    let err = bulk.find(doc(json!({"_id": 1}))).update_many(json!([])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidUpdate);

    let err = bulk
        .find(doc(json!({"_id": 1})))
        .replace_one(doc(json!({"$set": {"name": "x"}})))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidUpdate);

    assert!(bulk.is_empty());
}

#[tokio::test]
async fn find_modifiers_reach_the_statement() {
    let transport = Arc::new(MockTransport::new());
    let mut bulk = BulkOperation::unordered(transport.clone(), namespace());

    bulk.find(doc(json!({"name": "Ada"})))
        .upsert()
        .collation(doc(json!({"locale": "fr"})))
        .hint(Hint::Keys(doc(json!({"name": 1}))))
        .update_one(json!([{"$set": {"seen": true}}]))
        .unwrap()
        .find(doc(json!({"name": "Bob"})))
        .collation(doc(json!({"locale": "fr"})))
        .delete()
        .unwrap();

    bulk.execute(ExecuteOptions::default()).await.unwrap();

    let commands = transport.commands();
    let update = &commands[0].payload[0];
    assert_eq!(update["u"], json!([{"$set": {"seen": true}}]));
    assert_eq!(update["upsert"], json!(true));
    assert_eq!(update["hint"], json!({"name": 1}));

    let delete = &commands[1].payload[0];
    assert_eq!(delete["limit"], json!(0));
    assert_eq!(delete["collation"], json!({"locale": "fr"}));
}

#[test]
fn missing_or_null_ids_are_generated_first() {
    let transport = Arc::new(MockTransport::new());
    let mut bulk = BulkOperation::ordered(transport, namespace());

    bulk.insert(doc(json!({"name": "Ada"}))).unwrap();
    bulk.insert(doc(json!({"name": "Bob", "_id": null}))).unwrap();
    bulk.insert(doc(json!({"_id": "keep"}))).unwrap();

    let ids = bulk.inserted_ids();
    assert_eq!(ids.len(), 3);
    assert!(ids[&0].is_string());
    assert!(ids[&1].is_string());
    assert_ne!(ids[&0], ids[&1]);
    assert_eq!(ids[&2], json!("keep"));
}

#[tokio::test]
async fn server_generated_ids_are_not_recorded() {
    let transport = Arc::new(MockTransport::new());
    let config = BulkConfig {
        force_server_object_id: true,
        ..BulkConfig::default()
    };
    let mut bulk = BulkOperation::new(transport.clone(), namespace(), config);

    bulk.insert(doc(json!({"name": "Ada"}))).unwrap();
    assert!(bulk.inserted_ids().is_empty());

    let result = bulk.execute(ExecuteOptions::default()).await.unwrap();
    assert_eq!(result.inserted_count(), 1);
    assert_eq!(transport.commands()[0].payload, vec![doc(json!({"name": "Ada"}))]);
}

#[test]
fn encryption_caps_batch_bytes() {
    let transport = Arc::new(MockTransport::new());
    let config = BulkConfig {
        auto_encryption: true,
        ..BulkConfig::unordered()
    };
    let bulk = BulkOperation::new(transport, namespace(), config);

    assert_eq!(bulk.limits().max_batch_size_bytes, 2 * 1024 * 1024);
    assert_eq!(bulk.limits().max_bson_object_size, 16 * 1024 * 1024);
}
