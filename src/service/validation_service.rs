//! 样例验证服务
//!
//! 负责为验证者挑选候选样例，并把验证结论落到样例与轮次计数上。
//! 候选选取不做预留，同一样例可能同时被多个验证者拿到，
//! 计数收敛由仓储层的相对自增语句保证。

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::models::{Example, ValidationVerdict};
use crate::repository::{ExampleRepositoryTrait, RoundRepositoryTrait};

/// 样例验证服务
pub struct ValidationService<ER, RR>
where
    ER: ExampleRepositoryTrait,
    RR: RoundRepositoryTrait,
{
    example_repo: Arc<ER>,
    round_repo: Arc<RR>,
}

impl<ER, RR> ValidationService<ER, RR>
where
    ER: ExampleRepositoryTrait,
    RR: RoundRepositoryTrait,
{
    pub fn new(example_repo: Arc<ER>, round_repo: Arc<RR>) -> Self {
        Self {
            example_repo,
            round_repo,
        }
    }

    /// 为验证者随机挑选一条候选样例
    ///
    /// 候选条件：与验证者非同一用户、未撤回、验证次数未达配额。
    /// `fooling_only` 为 true 时只在骗过模型的样例中挑选。
    /// 无候选时返回 `None`，属正常业务结果而非错误。
    #[instrument(
        skip(self),
        fields(
            round_id = round_id,
            validator_uid = validator_uid,
            quota = quota,
            fooling_only = fooling_only,
        )
    )]
    pub async fn next_for_validator(
        &self,
        round_id: i64,
        validator_uid: i64,
        quota: i32,
        fooling_only: bool,
    ) -> Result<Option<Example>> {
        let candidate = if fooling_only {
            self.example_repo
                .next_fooling_to_validate(round_id, validator_uid, quota)
                .await?
        } else {
            self.example_repo
                .next_to_validate(round_id, validator_uid, quota)
                .await?
        };

        match &candidate {
            Some(example) => {
                debug!(example_id = example.id, "选取到待验证样例");
            }
            None => {
                info!(
                    round_id = round_id,
                    validator_uid = validator_uid,
                    "当前轮次无可验证样例"
                );
            }
        }

        Ok(candidate)
    }

    /// 记录一次验证结论
    ///
    /// 完整流程：
    /// 1. 样例总验证计数 +1
    /// 2. 按结论累计对应计数器
    /// 3. 骗过模型的样例被判定正确时，轮次已核实骗过计数 +1
    #[instrument(
        skip(self, example),
        fields(example_id = example.id, round_id = round_id, verdict = ?verdict)
    )]
    pub async fn record_verdict(
        &self,
        example: &Example,
        round_id: i64,
        verdict: ValidationVerdict,
    ) -> Result<()> {
        // 1. 总验证计数
        self.example_repo
            .increment_total_verified(example.id)
            .await?;

        // 2. 结论对应计数器
        match verdict {
            ValidationVerdict::Correct => {
                self.example_repo
                    .increment_verified_correct(example.id)
                    .await?;
            }
            ValidationVerdict::Incorrect => {
                self.example_repo
                    .increment_verified_incorrect(example.id)
                    .await?;
            }
            ValidationVerdict::Flagged => {
                self.example_repo
                    .increment_verified_flagged(example.id)
                    .await?;
            }
        }

        // 3. 已核实的骗过样例计入轮次统计
        if verdict == ValidationVerdict::Correct && example.model_wrong {
            self.round_repo.increment_verified_fooled(round_id).await?;
        }

        info!(
            example_id = example.id,
            round_id = round_id,
            verdict = ?verdict,
            "验证结论已记录"
        );

        Ok(())
    }

    /// 将样例标记为已完成验证
    #[instrument(skip(self), fields(example_id = example_id))]
    pub async fn mark_verified(&self, example_id: i64) -> Result<()> {
        self.example_repo.mark_verified(example_id).await?;
        info!(example_id = example_id, "样例已标记为验证完成");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::models::ExampleSplit;
    use crate::repository::{MockExampleRepositoryTrait, MockRoundRepositoryTrait};
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::json;

    fn example_fixture(id: i64, model_wrong: bool) -> Example {
        Example {
            id,
            cid: 1,
            uid: 2,
            model_wrong,
            model_endpoint_name: Some("ts1604014038-bert_test".to_string()),
            input_json: json!({"hypothesis": "Birds can fly"}),
            output_json: json!({"label": "entailed", "prob": 0.34}),
            metadata_json: json!({}),
            tag: None,
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
        }
    }

    fn service(
        example_repo: MockExampleRepositoryTrait,
        round_repo: MockRoundRepositoryTrait,
    ) -> ValidationService<MockExampleRepositoryTrait, MockRoundRepositoryTrait> {
        ValidationService::new(Arc::new(example_repo), Arc::new(round_repo))
    }

    #[tokio::test]
    async fn test_next_for_validator_uses_plain_selection() {
        let mut example_repo = MockExampleRepositoryTrait::new();
        let round_repo = MockRoundRepositoryTrait::new();

        example_repo
            .expect_next_to_validate()
            .with(eq(7), eq(42), eq(5))
            .times(1)
            .returning(|_, _, _| Ok(Some(example_fixture(900, false))));
        example_repo.expect_next_fooling_to_validate().times(0);

        let service = service(example_repo, round_repo);
        let candidate = service.next_for_validator(7, 42, 5, false).await.unwrap();
        assert_eq!(candidate.unwrap().id, 900);
    }

    #[tokio::test]
    async fn test_next_for_validator_dispatches_to_fooling_selection() {
        let mut example_repo = MockExampleRepositoryTrait::new();
        let round_repo = MockRoundRepositoryTrait::new();

        example_repo.expect_next_to_validate().times(0);
        example_repo
            .expect_next_fooling_to_validate()
            .with(eq(7), eq(42), eq(5))
            .times(1)
            .returning(|_, _, _| Ok(None));

        let service = service(example_repo, round_repo);
        let candidate = service.next_for_validator(7, 42, 5, true).await.unwrap();
        assert!(candidate.is_none());
    }

    #[tokio::test]
    async fn test_correct_verdict_on_fooling_example_updates_round() {
        let mut example_repo = MockExampleRepositoryTrait::new();
        let mut round_repo = MockRoundRepositoryTrait::new();

        let example = example_fixture(900, true);

        example_repo
            .expect_increment_total_verified()
            .with(eq(900))
            .times(1)
            .returning(|_| Ok(()));
        example_repo
            .expect_increment_verified_correct()
            .with(eq(900))
            .times(1)
            .returning(|_| Ok(()));
        round_repo
            .expect_increment_verified_fooled()
            .with(eq(7))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(example_repo, round_repo);
        service
            .record_verdict(&example, 7, ValidationVerdict::Correct)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_correct_verdict_on_non_fooling_example_skips_round() {
        let mut example_repo = MockExampleRepositoryTrait::new();
        let mut round_repo = MockRoundRepositoryTrait::new();

        let example = example_fixture(901, false);

        example_repo
            .expect_increment_total_verified()
            .times(1)
            .returning(|_| Ok(()));
        example_repo
            .expect_increment_verified_correct()
            .times(1)
            .returning(|_| Ok(()));
        round_repo.expect_increment_verified_fooled().times(0);

        let service = service(example_repo, round_repo);
        service
            .record_verdict(&example, 7, ValidationVerdict::Correct)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_incorrect_verdict_increments_incorrect_counter() {
        let mut example_repo = MockExampleRepositoryTrait::new();
        let mut round_repo = MockRoundRepositoryTrait::new();

        let example = example_fixture(902, true);

        example_repo
            .expect_increment_total_verified()
            .times(1)
            .returning(|_| Ok(()));
        example_repo
            .expect_increment_verified_incorrect()
            .with(eq(902))
            .times(1)
            .returning(|_| Ok(()));
        round_repo.expect_increment_verified_fooled().times(0);

        let service = service(example_repo, round_repo);
        service
            .record_verdict(&example, 7, ValidationVerdict::Incorrect)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_flagged_verdict_increments_flagged_counter() {
        let mut example_repo = MockExampleRepositoryTrait::new();
        let round_repo = MockRoundRepositoryTrait::new();

        let example = example_fixture(903, true);

        example_repo
            .expect_increment_total_verified()
            .times(1)
            .returning(|_| Ok(()));
        example_repo
            .expect_increment_verified_flagged()
            .with(eq(903))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(example_repo, round_repo);
        service
            .record_verdict(&example, 7, ValidationVerdict::Flagged)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_record_verdict_propagates_missing_example() {
        let mut example_repo = MockExampleRepositoryTrait::new();
        let round_repo = MockRoundRepositoryTrait::new();

        let example = example_fixture(904, false);

        example_repo
            .expect_increment_total_verified()
            .times(1)
            .returning(|_| {
                Err(DataError::NotFound {
                    entity: "example",
                    id: 904,
                })
            });
        example_repo.expect_increment_verified_correct().times(0);

        let service = service(example_repo, round_repo);
        let err = service
            .record_verdict(&example, 7, ValidationVerdict::Correct)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_mark_verified_delegates_to_repository() {
        let mut example_repo = MockExampleRepositoryTrait::new();
        let round_repo = MockRoundRepositoryTrait::new();

        example_repo
            .expect_mark_verified()
            .with(eq(905))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(example_repo, round_repo);
        service.mark_verified(905).await.unwrap();
    }
}
