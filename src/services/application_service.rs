use crate::entities::{
    ApplicationStatus, PointTransactionType, application_entity as applications,
    campaign_entity as campaigns, point_transaction_entity as pt, user_profile_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::point_service::{NewPointTransaction, record_transaction};
use crate::services::MailService;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};

#[derive(Clone)]
pub struct ApplicationService {
    pool: DatabaseConnection,
    mail_service: MailService,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalized_postal_code(value: Option<String>) -> AppResult<Option<String>> {
    match non_blank(value) {
        Some(code) => {
            validate_postal_code(&code)?;
            Ok(Some(to_ascii_digits(&code)))
        }
        None => Ok(None),
    }
}

async fn find_for_update<C: ConnectionTrait>(
    db: &C,
    application_id: i64,
) -> AppResult<applications::Model> {
    applications::Entity::find_by_id(application_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
}

impl ApplicationService {
    pub fn new(pool: DatabaseConnection, mail_service: MailService) -> Self {
        Self { pool, mail_service }
    }

    async fn find_owned(&self, user_id: i64, application_id: i64) -> AppResult<applications::Model> {
        applications::Entity::find_by_id(application_id)
            .filter(applications::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    // -----------------------------
    // 创作者
    // -----------------------------

    pub async fn apply(
        &self,
        user_id: i64,
        campaign_id: i64,
        request: ApplyRequest,
    ) -> AppResult<ApplicationResponse> {
        let campaign = campaigns::Entity::find_by_id(campaign_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;

        if !campaign.is_accepting_applications(Utc::now().date_naive()) {
            return Err(AppError::ValidationError(
                "This campaign is not accepting applications".to_string(),
            ));
        }

        let existing = applications::Entity::find()
            .filter(applications::Column::CampaignId.eq(campaign_id))
            .filter(applications::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "You have already applied to this campaign".to_string(),
            ));
        }

        let postal_code = normalized_postal_code(request.shipping_postal_code)?;

        let model = applications::ActiveModel {
            campaign_id: Set(campaign_id),
            user_id: Set(user_id),
            status: Set(ApplicationStatus::Pending),
            message: Set(non_blank(request.message)),
            shipping_name: Set(non_blank(request.shipping_name)),
            shipping_phone: Set(non_blank(request.shipping_phone)),
            shipping_postal_code: Set(postal_code),
            shipping_address: Set(non_blank(request.shipping_address)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| {
            // 并发申请时由 (campaign_id, user_id) 唯一索引兜底
            AppError::unique_violation_as_conflict(e, "You have already applied to this campaign")
        })?;

        log::info!("User {user_id} applied to campaign {campaign_id} (application {})", model.id);
        Ok(model.into())
    }

    pub async fn list_mine(
        &self,
        user_id: i64,
        query: &ApplicationQuery,
    ) -> AppResult<PaginatedResponse<ApplicationResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select =
            applications::Entity::find().filter(applications::Column::UserId.eq(user_id));
        if let Some(status) = query.status {
            select = select.filter(applications::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await? as i64;
        let rows = select
            .order_by_desc(applications::Column::CreatedAt)
            .order_by_desc(applications::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_mine(&self, user_id: i64, application_id: i64) -> AppResult<ApplicationResponse> {
        Ok(self.find_owned(user_id, application_id).await?.into())
    }

    /// 按原始字符串读取状态，遗留值不会导致整行解码失败
    pub async fn workflow(&self, user_id: i64, application_id: i64) -> AppResult<WorkflowResponse> {
        #[derive(Debug, FromQueryResult)]
        struct WorkflowRow {
            id: i64,
            status: String,
            revision_note: Option<String>,
        }

        let row = applications::Entity::find_by_id(application_id)
            .filter(applications::Column::UserId.eq(user_id))
            .select_only()
            .column(applications::Column::Id)
            .column(applications::Column::Status)
            .column(applications::Column::RevisionNote)
            .into_model::<WorkflowRow>()
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        Ok(WorkflowResponse::from_raw(row.id, row.status, row.revision_note))
    }

    /// 创作者提交动作的通用流程：校验归属与状态，写入字段
    async fn creator_transition<F>(
        &self,
        user_id: i64,
        application_id: i64,
        action: CreatorAction,
        apply_fields: F,
    ) -> AppResult<ApplicationResponse>
    where
        F: FnOnce(&mut applications::ActiveModel),
    {
        let txn = self.pool.begin().await?;

        let app = find_for_update(&txn, application_id).await?;
        if app.user_id != user_id {
            return Err(AppError::NotFound("Application not found".to_string()));
        }
        let next = action.next_status(app.status)?;

        let mut am = app.into_active_model();
        am.status = Set(next);
        apply_fields(&mut am);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;

        txn.commit().await?;

        log::info!("Application {application_id}: {action:?} -> {next}");
        Ok(updated.into())
    }

    pub async fn cancel(&self, user_id: i64, application_id: i64) -> AppResult<ApplicationResponse> {
        self.creator_transition(user_id, application_id, CreatorAction::Cancel, |_| {})
            .await
    }

    pub async fn submit_video(
        &self,
        user_id: i64,
        application_id: i64,
        request: SubmitVideoRequest,
    ) -> AppResult<ApplicationResponse> {
        let video_url = request.video_url.trim().to_string();
        validate_http_url("video_url", &video_url)?;

        self.creator_transition(user_id, application_id, CreatorAction::SubmitVideo, |am| {
            am.video_url = Set(Some(video_url));
            am.video_submitted_at = Set(Some(Utc::now()));
        })
        .await
    }

    pub async fn submit_sns(
        &self,
        user_id: i64,
        application_id: i64,
        request: SubmitSnsRequest,
    ) -> AppResult<ApplicationResponse> {
        let sns_url = request.sns_url.trim().to_string();
        validate_http_url("sns_url", &sns_url)?;
        let clean_video_url = non_blank(request.clean_video_url);
        if let Some(url) = &clean_video_url {
            validate_http_url("clean_video_url", url)?;
        }
        let ad_code = non_blank(request.ad_code);

        self.creator_transition(user_id, application_id, CreatorAction::SubmitSns, |am| {
            am.sns_url = Set(Some(sns_url));
            am.clean_video_url = Set(clean_video_url);
            am.ad_code = Set(ad_code);
            am.sns_submitted_at = Set(Some(Utc::now()));
        })
        .await
    }

    pub async fn upload_content(
        &self,
        user_id: i64,
        application_id: i64,
        request: UploadContentRequest,
    ) -> AppResult<ApplicationResponse> {
        let content_url = request.content_url.trim().to_string();
        validate_http_url("content_url", &content_url)?;

        self.creator_transition(user_id, application_id, CreatorAction::UploadContent, |am| {
            am.content_url = Set(Some(content_url));
            am.sns_submitted_at = Set(Some(Utc::now()));
        })
        .await
    }

    /// 更新收货联系方式，终态后不可修改
    pub async fn update_contact(
        &self,
        user_id: i64,
        application_id: i64,
        request: UpdateContactRequest,
    ) -> AppResult<ApplicationResponse> {
        let app = self.find_owned(user_id, application_id).await?;
        if app.status.is_terminal() {
            return Err(AppError::ValidationError(format!(
                "Contact details cannot be changed once the application is {}",
                app.status
            )));
        }

        let postal_code = normalized_postal_code(request.shipping_postal_code.clone())?;

        let mut am = app.into_active_model();
        if request.shipping_name.is_some() {
            am.shipping_name = Set(non_blank(request.shipping_name));
        }
        if request.shipping_phone.is_some() {
            am.shipping_phone = Set(non_blank(request.shipping_phone));
        }
        if request.shipping_postal_code.is_some() {
            am.shipping_postal_code = Set(postal_code);
        }
        if request.shipping_address.is_some() {
            am.shipping_address = Set(non_blank(request.shipping_address));
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    // -----------------------------
    // 管理员
    // -----------------------------

    pub async fn list_for_campaign(
        &self,
        campaign_id: i64,
        query: &ApplicationQuery,
    ) -> AppResult<PaginatedResponse<AdminApplicationResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = applications::Entity::find()
            .join(JoinType::LeftJoin, applications::Relation::User.def())
            .filter(applications::Column::CampaignId.eq(campaign_id));
        if let Some(status) = query.status {
            select = select.filter(applications::Column::Status.eq(status));
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(users::Column::Name.contains(search))
                    .add(users::Column::Email.contains(search)),
            );
        }

        let total = select.clone().count(&self.pool).await? as i64;
        let rows = select
            .select_also(users::Entity)
            .order_by_asc(applications::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let data = rows
            .into_iter()
            .map(|(app, user)| AdminApplicationResponse {
                admin_note: app.admin_note.clone(),
                applicant: user.as_ref().map(ApplicantSummary::from),
                application: app.into(),
            })
            .collect();

        Ok(PaginatedResponse::new(data, &params, total))
    }

    pub async fn review(
        &self,
        admin_id: i64,
        application_id: i64,
        request: ReviewApplicationRequest,
    ) -> AppResult<ApplicationResponse> {
        let note = non_blank(request.note);
        if request.action == ReviewAction::RequestRevision && note.is_none() {
            return Err(AppError::ValidationError(
                "A revision note is required".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let app = find_for_update(&txn, application_id).await?;
        let next = request.action.next_status(app.status)?;
        let now = Utc::now();

        let campaign = campaigns::Entity::find_by_id(app.campaign_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;

        let mut am = app.clone().into_active_model();
        am.status = Set(next);
        am.updated_at = Set(Some(now));
        match request.action {
            ReviewAction::Approve | ReviewAction::Reject | ReviewAction::ApproveVideo => {
                am.reviewed_at = Set(Some(now));
                if note.is_some() {
                    am.admin_note = Set(note.clone());
                }
            }
            ReviewAction::RequestRevision => {
                am.reviewed_at = Set(Some(now));
                am.revision_note = Set(note.clone());
            }
            ReviewAction::Complete => {
                am.completed_at = Set(Some(now));
                if note.is_some() {
                    am.admin_note = Set(note.clone());
                }
            }
            ReviewAction::Cancel => {
                if note.is_some() {
                    am.admin_note = Set(note.clone());
                }
            }
        }
        let updated = am.update(&txn).await?;

        if request.action == ReviewAction::Complete {
            self.accrue_reward(&txn, &updated, &campaign).await?;
        }

        txn.commit().await?;

        log::info!(
            "Admin {admin_id} reviewed application {application_id}: {} -> {next}",
            app.status
        );

        self.send_review_notification(&updated, &campaign, request.action, note.as_deref())
            .await;

        Ok(updated.into())
    }

    /// 完成奖励，同一应募只发放一次
    async fn accrue_reward<C: ConnectionTrait>(
        &self,
        db: &C,
        app: &applications::Model,
        campaign: &campaigns::Model,
    ) -> AppResult<()> {
        let already = pt::Entity::find()
            .filter(pt::Column::RelatedApplicationId.eq(app.id))
            .filter(pt::Column::TransactionType.eq(PointTransactionType::CampaignReward))
            .one(db)
            .await?;
        if already.is_some() {
            log::warn!("Reward for application {} already accrued, skipping", app.id);
            return Ok(());
        }

        record_transaction(
            db,
            NewPointTransaction {
                user_id: app.user_id,
                transaction_type: PointTransactionType::CampaignReward,
                amount: campaign.reward_points,
                related_application_id: Some(app.id),
                related_withdrawal_id: None,
                description: Some(format!("{} / {}", campaign.brand, campaign.title)),
            },
        )
        .await?;

        log::info!(
            "Accrued {} points to user {} for application {}",
            campaign.reward_points,
            app.user_id,
            app.id
        );
        Ok(())
    }

    async fn send_review_notification(
        &self,
        app: &applications::Model,
        campaign: &campaigns::Model,
        action: ReviewAction,
        note: Option<&str>,
    ) {
        if !matches!(action, ReviewAction::Approve | ReviewAction::Reject) {
            return;
        }

        let user = match users::Entity::find_by_id(app.user_id).one(&self.pool).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(e) => {
                log::error!("Failed to load applicant {} for notification: {e}", app.user_id);
                return;
            }
        };

        match action {
            ReviewAction::Approve => {
                self.mail_service
                    .notify_application_approved(&user.email, &user.name, &campaign.title)
                    .await
            }
            _ => {
                self.mail_service
                    .notify_application_rejected(&user.email, &user.name, &campaign.title, note)
                    .await
            }
        }
    }

    /// 导出应募者 CSV，按应募 ID 排序
    pub async fn export_csv(
        &self,
        campaign_id: i64,
        status: Option<ApplicationStatus>,
    ) -> AppResult<String> {
        let mut select = applications::Entity::find()
            .filter(applications::Column::CampaignId.eq(campaign_id));
        if let Some(status) = status {
            select = select.filter(applications::Column::Status.eq(status));
        }

        let rows = select
            .find_also_related(users::Entity)
            .order_by_asc(applications::Column::Id)
            .all(&self.pool)
            .await?;

        applications_to_csv(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_postal_code() {
        assert_eq!(normalized_postal_code(None).unwrap(), None);
        assert_eq!(normalized_postal_code(Some("  ".into())).unwrap(), None);
        assert_eq!(
            normalized_postal_code(Some("１５０-０００１".into())).unwrap(),
            Some("150-0001".to_string())
        );
        assert!(normalized_postal_code(Some("abc".into())).is_err());
    }
}
