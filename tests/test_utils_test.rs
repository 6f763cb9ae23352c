//! test_utils 模块的集成测试
//!
//! 验证测试工具模块的功能正确性，不依赖数据库。

use crowdloop_data::models::{Example, ExampleSplit};
use crowdloop_data::test_utils::*;
use chrono::Utc;
use serde_json::json;

// ==================== 测试数据生成器测试 ====================

#[test]
fn test_context_payload_shape() {
    let payload = TestDataGenerator::context_payload("wildlife");

    assert_eq!(payload["topic"], "wildlife");
    assert_eq!(payload["source"], "test");
    assert!(payload["context"].as_str().unwrap().contains("wildlife"));
}

#[test]
fn test_input_payload_shape() {
    let payload = TestDataGenerator::input_payload("The lake froze overnight");

    assert_eq!(payload["hypothesis"], "The lake froze overnight");
    assert_eq!(payload["statement"], "The lake froze overnight");
}

#[test]
fn test_model_output_payload_confidence_boundary() {
    let confident = TestDataGenerator::model_output_payload("entailment", 0.5);
    assert_eq!(confident["model_is_correct"], true);

    let fooled = TestDataGenerator::model_output_payload("entailment", 0.49);
    assert_eq!(fooled["model_is_correct"], false);
}

#[test]
fn test_new_context_generation() {
    let new_context = TestDataGenerator::new_context(77, "history");

    assert_eq!(new_context.r_realid, 77);
    assert_eq!(new_context.context_json["topic"], "history");
    assert!(new_context.tag.as_deref().unwrap().starts_with("test-"));
}

#[test]
fn test_new_example_defaults_to_not_fooling() {
    let new_example = TestDataGenerator::new_example(5, 42);

    assert_eq!(new_example.cid, 5);
    assert_eq!(new_example.uid, 42);
    assert!(!new_example.model_wrong);
    assert!(new_example.model_endpoint_name.is_none());
    assert_eq!(new_example.metadata_json, json!({}));
}

#[test]
fn test_fooling_example_carries_endpoint() {
    let new_example = TestDataGenerator::new_fooling_example(5, 42);

    assert!(new_example.model_wrong);
    assert_eq!(
        new_example.model_endpoint_name.as_deref(),
        Some("ts1604014038-bert_test")
    );
}

#[test]
fn test_badge_generation() {
    let new_badge = TestDataGenerator::new_badge(42, "first_verified_fooling");

    assert_eq!(new_badge.uid, 42);
    assert_eq!(new_badge.name, "first_verified_fooling");
    assert_eq!(new_badge.metadata_json["source"], "test");
}

// ==================== 生成数据与领域谓词的配合 ====================

/// 由生成器载荷拼出的样例应能直接走验证资格判断
#[test]
fn test_generated_example_passes_validation_predicates() {
    let new_example = TestDataGenerator::new_fooling_example(5, 42);
    let example = Example {
        id: 1,
        cid: new_example.cid,
        uid: new_example.uid,
        model_wrong: new_example.model_wrong,
        model_endpoint_name: new_example.model_endpoint_name.clone(),
        input_json: new_example.input_json.clone(),
        output_json: new_example.output_json.clone(),
        metadata_json: new_example.metadata_json.clone(),
        tag: new_example.tag.clone(),
        retracted: false,
        flagged: false,
        verified: false,
        split: ExampleSplit::Undecided,
        total_verified: 0,
        verified_correct: 0,
        verified_incorrect: 0,
        verified_flagged: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert!(example.is_fooling_candidate_for(99, 5));
    assert!(!example.is_fooling_candidate_for(42, 5), "创建者不能验证自己的样例");
}

// ==================== 辅助函数测试 ====================

#[test]
fn test_task_id_uniqueness() {
    let ids: Vec<i64> = (0..100).map(|_| test_task_id()).collect();
    let unique_count = ids.iter().collect::<std::collections::HashSet<_>>().len();

    assert_eq!(unique_count, 100, "生成的任务 ID 应该唯一");
}

#[test]
fn test_user_id_uniqueness() {
    let ids: Vec<i64> = (0..100).map(|_| test_user_id()).collect();
    let unique_count = ids.iter().collect::<std::collections::HashSet<_>>().len();

    assert_eq!(unique_count, 100, "生成的用户 ID 应该唯一");
}

#[test]
fn test_tag_format() {
    let tag = test_tag();

    assert!(tag.starts_with("test-"));
    assert_ne!(tag, test_tag());
}

#[test]
fn test_database_config_creation() {
    let config = test_database_config();

    assert!(config.url.contains("postgres://"));
    assert!(config.max_connections > 0);
    assert!(config.connect_timeout_seconds > 0);
}
