//! 管理后台应募者 CSV 导出

use crate::entities::{application_entity as applications, user_profile_entity as users};
use crate::error::{AppError, AppResult};

/// 列顺序固定，前端与运营表格依赖此顺序
pub const APPLICANT_CSV_HEADERS: [&str; 14] = [
    "Application ID",
    "Name",
    "Email",
    "Phone",
    "Instagram",
    "TikTok",
    "YouTube",
    "Followers",
    "Status",
    "Video URL",
    "SNS URL",
    "Postal Code",
    "Address",
    "Applied At",
];

const UTF8_BOM: &str = "\u{feff}";

fn applicant_row(app: &applications::Model, user: Option<&users::Model>) -> [String; 14] {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let from_user = |f: fn(&users::Model) -> Option<String>| user.and_then(f).unwrap_or_default();

    let phone = app
        .shipping_phone
        .clone()
        .or_else(|| user.and_then(|u| u.phone.clone()))
        .unwrap_or_default();
    let postal_code = app
        .shipping_postal_code
        .clone()
        .or_else(|| user.and_then(|u| u.postal_code.clone()))
        .unwrap_or_default();
    let address = app
        .shipping_address
        .clone()
        .or_else(|| user.and_then(|u| u.address.clone()))
        .unwrap_or_default();

    [
        app.id.to_string(),
        user.map(|u| u.name.clone())
            .or_else(|| app.shipping_name.clone())
            .unwrap_or_default(),
        user.map(|u| u.email.clone()).unwrap_or_default(),
        phone,
        from_user(|u| u.instagram_url.clone()),
        from_user(|u| u.tiktok_url.clone()),
        from_user(|u| u.youtube_url.clone()),
        user.map(|u| u.total_followers()).unwrap_or(0).to_string(),
        app.status.to_string(),
        opt(&app.video_url),
        opt(&app.sns_url),
        postal_code,
        address,
        app.created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
    ]
}

/// 生成带 BOM 的 CSV 文本，每个应募一行
pub fn applications_to_csv(rows: &[(applications::Model, Option<users::Model>)]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(APPLICANT_CSV_HEADERS)?;
    for (app, user) in rows {
        writer.write_record(applicant_row(app, user.as_ref()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalError(format!("CSV flush failed: {e}")))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| AppError::InternalError(format!("CSV is not valid UTF-8: {e}")))?;
    Ok(format!("{UTF8_BOM}{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ApplicationStatus, UserRole};
    use chrono::{TimeZone, Utc};

    fn user(id: i64, name: &str) -> users::Model {
        users::Model {
            id,
            email: format!("user{id}@example.jp"),
            password_hash: String::new(),
            role: UserRole::Creator,
            name: name.to_string(),
            name_kana: None,
            phone: Some("090-0000-0000".to_string()),
            instagram_url: Some("https://instagram.com/x".to_string()),
            tiktok_url: None,
            youtube_url: None,
            instagram_followers: 1200,
            tiktok_followers: 300,
            youtube_subscribers: 0,
            postal_code: Some("150-0001".to_string()),
            prefecture: None,
            address: Some("東京都渋谷区".to_string()),
            bank_name: None,
            branch_name: None,
            branch_code: None,
            account_type: None,
            account_number: None,
            account_holder: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn application(id: i64, user_id: i64, status: ApplicationStatus) -> applications::Model {
        applications::Model {
            id,
            campaign_id: 1,
            user_id,
            status,
            message: None,
            shipping_name: None,
            shipping_phone: None,
            shipping_postal_code: None,
            shipping_address: Some("大阪府大阪市, 1-2-3".to_string()),
            video_url: Some("https://youtu.be/v".to_string()),
            clean_video_url: None,
            sns_url: None,
            ad_code: None,
            content_url: None,
            revision_note: None,
            admin_note: None,
            video_submitted_at: None,
            sns_submitted_at: None,
            reviewed_at: None,
            completed_at: None,
            created_at: Some(Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    fn parse(csv_text: &str) -> Vec<Vec<String>> {
        let body = csv_text.strip_prefix(UTF8_BOM).unwrap();
        csv::Reader::from_reader(body.as_bytes())
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_and_row_count() {
        let rows = vec![
            (application(1, 10, ApplicationStatus::Approved), Some(user(10, "山田"))),
            (application(2, 11, ApplicationStatus::Pending), Some(user(11, "佐藤"))),
            (application(3, 12, ApplicationStatus::Completed), None),
        ];
        let text = applications_to_csv(&rows).unwrap();
        assert!(text.starts_with(UTF8_BOM));

        let first_line = text.strip_prefix(UTF8_BOM).unwrap().lines().next().unwrap();
        assert_eq!(first_line, APPLICANT_CSV_HEADERS.join(","));

        let records = parse(&text);
        assert_eq!(records.len(), rows.len());
        for record in &records {
            assert_eq!(record.len(), APPLICANT_CSV_HEADERS.len());
        }
    }

    #[test]
    fn test_column_values_and_quoting() {
        let rows = vec![(
            application(5, 10, ApplicationStatus::VideoSubmitted),
            Some(user(10, "山田")),
        )];
        let records = parse(&applications_to_csv(&rows).unwrap());
        let row = &records[0];
        assert_eq!(row[0], "5");
        assert_eq!(row[1], "山田");
        assert_eq!(row[2], "user10@example.jp");
        assert_eq!(row[3], "090-0000-0000");
        assert_eq!(row[7], "1500");
        assert_eq!(row[8], "video_submitted");
        // 配送地址优先于个人资料地址，逗号需被正确引用
        assert_eq!(row[12], "大阪府大阪市, 1-2-3");
        assert_eq!(row[13], "2025-09-01 10:00:00");
    }

    #[test]
    fn test_follower_total_saturates() {
        let mut big = user(10, "山田");
        big.instagram_followers = i64::MAX;
        big.tiktok_followers = i64::MAX;
        big.youtube_subscribers = 1;
        let rows = vec![(application(6, 10, ApplicationStatus::Approved), Some(big))];
        let records = parse(&applications_to_csv(&rows).unwrap());
        assert_eq!(records[0][7], i64::MAX.to_string());
    }

    #[test]
    fn test_empty_export_has_only_header() {
        let text = applications_to_csv(&[]).unwrap();
        assert!(parse(&text).is_empty());
        assert_eq!(text.strip_prefix(UTF8_BOM).unwrap().lines().count(), 1);
    }
}
