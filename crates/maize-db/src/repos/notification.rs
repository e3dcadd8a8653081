//! Notification inbox repository.

use chrono::{DateTime, TimeDelta, Utc};
use maize_core::entities::Notification;
use maize_core::enums::NotificationKind;
use maize_core::ids::PREFIX_NOTIFICATION;
use maize_core::responses::NotificationStats;

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_bool, get_count, now, parse_datetime, parse_enum};
use crate::service::MaizeService;

/// Fields for a new notification. `created_at` defaults to now.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// `?filter=` on the inbox listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadFilter {
    #[default]
    All,
    Read,
    Unread,
}

impl ReadFilter {
    /// Unknown values mean no filter.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("read") => Self::Read,
            Some("unread") => Self::Unread,
            _ => Self::All,
        }
    }

    const fn clause(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Read => "AND is_read = 1",
            Self::Unread => "AND is_read = 0",
        }
    }
}

/// The sample inbox installed by [`MaizeService::seed_dummy_notifications`],
/// newest first.
const DUMMY_NOTIFICATIONS: &[(&str, &str, NotificationKind, bool)] = &[
    (
        "Kelembaban Terlalu Tinggi",
        "Kelembaban tanah mencapai 85%. Segera lakukan tindakan untuk mengurangi kelembaban.\n\nTanggal: 08 Nov 2025, 14:30\nSuhu: 28°C, Kelembaban tanah: 85%",
        NotificationKind::Warning,
        false,
    ),
    (
        "Penyakit Terdeteksi!",
        "Penyakit daun jagung terdeteksi pada pemeriksaan terakhir.\n\nTanggal: 08 Nov 2025, 10:15\nPenyakit: Common Rust\nTingkat: Sedang",
        NotificationKind::Danger,
        false,
    ),
    (
        "Rekomendasi Perawatan",
        "Tanaman kurang sehat. Disarankan untuk melakukan pemupukan dan penyiraman yang lebih teratur.",
        NotificationKind::Info,
        false,
    ),
    (
        "Pemeriksaan Berhasil",
        "Pemeriksaan daun jagung telah selesai. Semua tanaman dalam kondisi sehat.",
        NotificationKind::Success,
        true,
    ),
    (
        "Suhu Melebihi Batas",
        "Suhu udara mencapai 32°C. Ini melebihi batas ideal untuk pertumbuhan jagung (28-30°C).",
        NotificationKind::Warning,
        true,
    ),
    (
        "Nutrisi Tanah Rendah",
        "Kadar nitrogen dalam tanah terdeteksi rendah. Lakukan pemupukan nitrogen dalam 3-5 hari ke depan.",
        NotificationKind::Warning,
        true,
    ),
    (
        "Penyiraman Berhasil",
        "Penyiraman tanaman telah selesai dilakukan. Total air yang diberikan: 50mm.",
        NotificationKind::Success,
        true,
    ),
    (
        "Peringatan: Hama Terdeteksi",
        "Hama penggerek batang (stem borer) terdeteksi di area tanaman. Segera ambil tindakan pengendalian.",
        NotificationKind::Danger,
        true,
    ),
    (
        "Jadwal Pemupukan",
        "Jadwal pemupukan berkala sudah tiba. Direkomendasikan untuk melakukan pemupukan NPK minggu ini.",
        NotificationKind::Info,
        true,
    ),
    (
        "Monitoring Rutin",
        "Waktu monitoring rutin telah tiba. Lakukan pemeriksaan tanaman dan catat kondisi terkini.",
        NotificationKind::Info,
        true,
    ),
    (
        "Kelembaban Optimal",
        "Kondisi kelembaban tanah saat ini optimal (60-70%) untuk pertumbuhan jagung. Pertahankan kondisi ini.",
        NotificationKind::Success,
        false,
    ),
    (
        "Penyakit Terkontrol",
        "Penyakit yang sebelumnya terdeteksi sudah terkontrol dengan baik setelah dilakukan penyemprotan fungisida.",
        NotificationKind::Success,
        false,
    ),
];

/// Body of the notification created by `POST /notifications/test`.
pub const TEST_NOTIFICATION: (&str, &str) = (
    "Test Notification",
    "Ini adalah notifikasi test dari server. Berhasil terhubung ke backend!",
);

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, body, kind, is_read, created_at";

fn row_to_notification(row: &libsql::Row) -> Result<Notification, DatabaseError> {
    let kind: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        kind: parse_enum(&kind)?,
        is_read: get_bool(row, 5)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl MaizeService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn create_notification(
        &self,
        new: NewNotification,
    ) -> Result<Notification, DatabaseError> {
        let id = self.db().generate_id(PREFIX_NOTIFICATION).await?;
        let created_at = new.created_at.unwrap_or_else(now);
        self.db()
            .conn()
            .execute(
                "INSERT INTO notifications (id, user_id, title, body, kind, is_read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    new.user_id.as_str(),
                    new.title.as_str(),
                    new.body.as_str(),
                    new.kind.as_str(),
                    i64::from(new.is_read),
                    fmt_datetime(created_at),
                ],
            )
            .await?;
        Ok(Notification {
            id,
            user_id: new.user_id,
            title: new.title,
            body: new.body,
            kind: new.kind,
            is_read: new.is_read,
            created_at,
        })
    }

    /// Inbox for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_notifications(
        &self,
        user_id: &str,
        filter: ReadFilter,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE user_id = ?1 {} ORDER BY created_at DESC, id",
            filter.clause()
        );
        let mut rows = self.db().conn().query(&sql, [user_id]).await?;
        let mut notifications = Vec::new();
        while let Some(row) = rows.next().await? {
            notifications.push(row_to_notification(&row)?);
        }
        Ok(notifications)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn unread_count(&self, user_id: &str) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
                [user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        get_count(&row, 0)
    }

    /// Totals by read state and by kind.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn notification_stats(&self, user_id: &str) -> Result<NotificationStats, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT kind, is_read, COUNT(*) FROM notifications
                 WHERE user_id = ?1 GROUP BY kind, is_read",
                [user_id],
            )
            .await?;

        let mut stats = NotificationStats::default();
        while let Some(row) = rows.next().await? {
            let kind: String = row.get(0)?;
            let is_read = get_bool(&row, 1)?;
            let n = get_count(&row, 2)?;
            stats.total += n;
            if is_read {
                stats.read += n;
            } else {
                stats.unread += n;
            }
            *stats.by_type.entry(kind).or_default() += n;
        }
        Ok(stats)
    }

    /// Mark one notification read. Returns `None` if it does not belong to
    /// the user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn mark_notification_read(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Notification>, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )
            .await?;
        if changed == 0 {
            return Ok(None);
        }
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1");
        let mut rows = self.db().conn().query(&sql, [id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_notification(&row)?)),
            None => Ok(None),
        }
    }

    /// Returns the number of notifications that changed state.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64, DatabaseError> {
        Ok(self
            .db()
            .conn()
            .execute(
                "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
                [user_id],
            )
            .await?)
    }

    /// Returns `true` if a notification was deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_notification(&self, user_id: &str, id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM notifications WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Returns the number of notifications deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_all_notifications(&self, user_id: &str) -> Result<u64, DatabaseError> {
        Ok(self
            .db()
            .conn()
            .execute("DELETE FROM notifications WHERE user_id = ?1", [user_id])
            .await?)
    }

    /// Replace a user's inbox with the sample notifications, spaced one hour
    /// apart ending now. Returned newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails; the inbox is left
    /// unchanged in that case.
    pub async fn seed_dummy_notifications(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let base = now();
        let tx = self.db().conn().transaction().await?;
        let deleted = tx
            .execute("DELETE FROM notifications WHERE user_id = ?1", [user_id])
            .await?;

        let mut created = Vec::with_capacity(DUMMY_NOTIFICATIONS.len());
        for (hours, (title, body, kind, is_read)) in (0_i64..).zip(DUMMY_NOTIFICATIONS) {
            let id = self.db().generate_id(PREFIX_NOTIFICATION).await?;
            let created_at = base - TimeDelta::hours(hours);
            tx.execute(
                "INSERT INTO notifications (id, user_id, title, body, kind, is_read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    user_id,
                    *title,
                    *body,
                    kind.as_str(),
                    i64::from(*is_read),
                    fmt_datetime(created_at),
                ],
            )
            .await?;
            created.push(Notification {
                id,
                user_id: user_id.to_string(),
                title: (*title).to_string(),
                body: (*body).to_string(),
                kind: *kind,
                is_read: *is_read,
                created_at,
            });
        }
        tx.commit().await?;

        tracing::info!(user_id, deleted, created = created.len(), "seeded sample notifications");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use maize_core::responses::SeedStats;
    use pretty_assertions::assert_eq;

    fn note(user: &str, kind: NotificationKind, is_read: bool) -> NewNotification {
        NewNotification {
            user_id: user.into(),
            title: "Kelembaban".into(),
            body: "85%".into(),
            kind,
            is_read,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn filter_and_counts() {
        let svc = test_service().await;
        svc.create_notification(note("u1", NotificationKind::Warning, false))
            .await
            .unwrap();
        svc.create_notification(note("u1", NotificationKind::Info, true))
            .await
            .unwrap();
        svc.create_notification(note("u2", NotificationKind::Danger, false))
            .await
            .unwrap();

        assert_eq!(svc.list_notifications("u1", ReadFilter::All).await.unwrap().len(), 2);
        assert_eq!(svc.list_notifications("u1", ReadFilter::Read).await.unwrap().len(), 1);
        assert_eq!(svc.list_notifications("u1", ReadFilter::Unread).await.unwrap().len(), 1);
        assert_eq!(svc.unread_count("u1").await.unwrap(), 1);

        let stats = svc.notification_stats("u1").await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.read, 1);
        assert_eq!(stats.unread, 1);
        assert_eq!(stats.by_type.get("warning"), Some(&1));
        assert_eq!(stats.by_type.get("danger"), None);
    }

    #[tokio::test]
    async fn mark_read_is_owner_scoped() {
        let svc = test_service().await;
        let n = svc
            .create_notification(note("u1", NotificationKind::Info, false))
            .await
            .unwrap();

        assert!(svc.mark_notification_read("u2", &n.id).await.unwrap().is_none());
        let read = svc.mark_notification_read("u1", &n.id).await.unwrap().unwrap();
        assert!(read.is_read);
        assert_eq!(svc.mark_all_notifications_read("u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_one_and_all() {
        let svc = test_service().await;
        let n = svc
            .create_notification(note("u1", NotificationKind::Info, false))
            .await
            .unwrap();
        svc.create_notification(note("u1", NotificationKind::Info, false))
            .await
            .unwrap();

        assert!(!svc.delete_notification("u2", &n.id).await.unwrap());
        assert!(svc.delete_notification("u1", &n.id).await.unwrap());
        assert_eq!(svc.delete_all_notifications("u1").await.unwrap(), 1);
        assert_eq!(svc.unread_count("u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn seed_replaces_inbox_with_twelve_hourly_samples() {
        let svc = test_service().await;
        svc.create_notification(note("u1", NotificationKind::Info, false))
            .await
            .unwrap();

        let created = svc.seed_dummy_notifications("u1").await.unwrap();
        assert_eq!(created.len(), 12);
        for pair in created.windows(2) {
            assert_eq!(pair[0].created_at - pair[1].created_at, TimeDelta::hours(1));
        }

        let listed = svc.list_notifications("u1", ReadFilter::All).await.unwrap();
        assert_eq!(listed, created);

        let stats = SeedStats::from_notifications(&created);
        assert_eq!(stats.by_read.unread, 5);
        assert_eq!(stats.by_read.read, 7);
        assert_eq!(stats.by_type.get("success"), Some(&4));
    }

    #[test]
    fn unknown_filter_means_all() {
        assert_eq!(ReadFilter::from_query(Some("read")), ReadFilter::Read);
        assert_eq!(ReadFilter::from_query(Some("unread")), ReadFilter::Unread);
        assert_eq!(ReadFilter::from_query(Some("everything")), ReadFilter::All);
        assert_eq!(ReadFilter::from_query(None), ReadFilter::All);
    }
}
