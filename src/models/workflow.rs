//! 创作者 4 步流程的进度视图
//!
//! 1. 视频提交 -> 2. 修改 -> 3. SNS 投稿 / 无字幕视频 / 广告码提交 -> 4. 完成
//!
//! 各步骤状态完全由 `applications.status` 推导，不单独持久化。

use crate::entities::ApplicationStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Done,
    Active,
    Locked,
    Revision,
    Reviewing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct StepStates {
    pub video: StepState,
    pub revision: StepState,
    pub delivery: StepState,
    pub completion: StepState,
}

impl StepStates {
    const fn new(
        video: StepState,
        revision: StepState,
        delivery: StepState,
        completion: StepState,
    ) -> Self {
        Self {
            video,
            revision,
            delivery,
            completion,
        }
    }

    pub const ALL_LOCKED: StepStates = StepStates::new(
        StepState::Locked,
        StepState::Locked,
        StepState::Locked,
        StepState::Locked,
    );

    pub fn as_array(&self) -> [StepState; 4] {
        [self.video, self.revision, self.delivery, self.completion]
    }

    /// 当前所在步骤（1 起始）；全部锁定时为 None，全部完成时为 4
    pub fn current_step(&self) -> Option<u8> {
        let steps = self.as_array();
        if steps.iter().all(|s| *s == StepState::Done) {
            return Some(4);
        }
        steps
            .iter()
            .position(|s| !matches!(s, StepState::Done | StepState::Locked))
            .map(|idx| idx as u8 + 1)
    }
}

pub fn compute_step_states(status: ApplicationStatus) -> StepStates {
    use StepState::*;

    match status {
        ApplicationStatus::Pending | ApplicationStatus::Rejected | ApplicationStatus::Cancelled => {
            StepStates::ALL_LOCKED
        }
        ApplicationStatus::Approved => StepStates::new(Active, Locked, Locked, Locked),
        ApplicationStatus::VideoSubmitted => StepStates::new(Done, Reviewing, Locked, Locked),
        ApplicationStatus::RevisionRequested => StepStates::new(Done, Revision, Locked, Locked),
        ApplicationStatus::VideoApproved => StepStates::new(Done, Done, Active, Locked),
        ApplicationStatus::ContentUploaded | ApplicationStatus::SnsUploaded => {
            StepStates::new(Done, Done, Done, Reviewing)
        }
        ApplicationStatus::Completed => StepStates::new(Done, Done, Done, Done),
    }
}

/// 数据库里可能存在历史遗留的状态字符串，无法识别时全部锁定
pub fn compute_step_states_str(status: &str) -> StepStates {
    ApplicationStatus::from_str(status)
        .map(compute_step_states)
        .unwrap_or(StepStates::ALL_LOCKED)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkflowResponse {
    pub application_id: i64,
    /// 数据库中的原始状态字符串
    pub status: String,
    pub steps: StepStates,
    pub current_step: Option<u8>,
    pub revision_note: Option<String>,
}

impl WorkflowResponse {
    pub fn from_raw(application_id: i64, status: String, revision_note: Option<String>) -> Self {
        let steps = compute_step_states_str(&status);
        Self {
            application_id,
            status,
            current_step: steps.current_step(),
            steps,
            revision_note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StepState::*;

    #[test]
    fn test_every_known_status_maps_to_full_tuple() {
        for status in ApplicationStatus::ALL {
            let states = compute_step_states(status);
            assert_eq!(states.as_array().len(), 4);
            // 序列化后四个键都必须存在
            let json = serde_json::to_value(states).unwrap();
            for key in ["video", "revision", "delivery", "completion"] {
                assert!(json.get(key).is_some(), "{status} missing {key}");
            }
        }
    }

    #[test]
    fn test_mapping_table() {
        assert_eq!(
            compute_step_states(ApplicationStatus::Approved).as_array(),
            [Active, Locked, Locked, Locked]
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::VideoSubmitted).as_array(),
            [Done, Reviewing, Locked, Locked]
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::RevisionRequested).as_array(),
            [Done, Revision, Locked, Locked]
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::VideoApproved).as_array(),
            [Done, Done, Active, Locked]
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::SnsUploaded).as_array(),
            [Done, Done, Done, Reviewing]
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::ContentUploaded),
            compute_step_states(ApplicationStatus::SnsUploaded)
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::Completed).as_array(),
            [Done, Done, Done, Done]
        );
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Rejected,
            ApplicationStatus::Cancelled,
        ] {
            assert_eq!(compute_step_states(status), StepStates::ALL_LOCKED);
        }
    }

    #[test]
    fn test_unknown_status_string_is_locked() {
        assert_eq!(compute_step_states_str("shipped"), StepStates::ALL_LOCKED);
        assert_eq!(compute_step_states_str(""), StepStates::ALL_LOCKED);
        assert_eq!(
            compute_step_states_str("video_submitted"),
            compute_step_states(ApplicationStatus::VideoSubmitted)
        );
    }

    #[test]
    fn test_workflow_from_unrecognized_status() {
        let workflow = WorkflowResponse::from_raw(9, "shipped".to_string(), None);
        assert_eq!(workflow.status, "shipped");
        assert_eq!(workflow.steps, StepStates::ALL_LOCKED);
        assert_eq!(workflow.current_step, None);

        let workflow = WorkflowResponse::from_raw(
            9,
            "revision_requested".to_string(),
            Some("音量を上げてください".to_string()),
        );
        assert_eq!(workflow.steps.revision, Revision);
        assert_eq!(workflow.current_step, Some(2));
        let json = serde_json::to_value(&workflow).unwrap();
        assert_eq!(json["status"], "revision_requested");
    }

    #[test]
    fn test_current_step() {
        assert_eq!(StepStates::ALL_LOCKED.current_step(), None);
        assert_eq!(
            compute_step_states(ApplicationStatus::Approved).current_step(),
            Some(1)
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::RevisionRequested).current_step(),
            Some(2)
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::VideoApproved).current_step(),
            Some(3)
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::SnsUploaded).current_step(),
            Some(4)
        );
        assert_eq!(
            compute_step_states(ApplicationStatus::Completed).current_step(),
            Some(4)
        );
    }
}
