//! 邮件操作服务
//!
//! Each call opens a session, runs one operation and drops the session on
//! every exit path.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{FilterRequest, ListRequest, ReadRequest, SearchRequest};

/// 邮件操作服务
pub struct MailService {
    ctx: Arc<ServiceContext>,
}

impl MailService {
    /// 创建邮件服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 列出账户、文件夹或文件夹内容
    pub async fn list(&self, request: &ListRequest) -> CoreResult<String> {
        log::debug!("list path='{}' all={}", request.path, request.show_all);
        let session = self.ctx.open_session().await?;
        session.list_path(request).await
    }

    /// 按条件过滤
    pub async fn filter(&self, request: &FilterRequest) -> CoreResult<String> {
        log::debug!(
            "filter path='{}' range={:?} days={:?} type={:?}",
            request.path,
            request.range,
            request.days_back,
            request.item_type
        );
        let session = self.ctx.open_session().await?;
        session.filter_path(request).await
    }

    /// 全文搜索
    pub async fn search(&self, request: &SearchRequest) -> CoreResult<String> {
        log::debug!(
            "search pattern='{}' groups={} path='{}' offset={}",
            request.query.pattern(),
            request.query.groups().len(),
            request.path,
            request.offset
        );
        let session = self.ctx.open_session().await?;
        session.search_path(request).await
    }

    /// 读取单个条目
    pub async fn read(&self, request: &ReadRequest) -> CoreResult<String> {
        log::debug!("read entry_id={}", request.entry_id.display_prefix());
        let session = self.ctx.open_session().await?;
        session.read_item(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::{sample_store, service_with};
    use crate::types::OutputMode;
    use crate::utils::datetime::DateRange;

    #[tokio::test]
    async fn sessions_are_released_after_success_and_error() {
        let store = sample_store();
        let counter = store.active_sessions();
        let service = service_with(store);

        let ok = ListRequest::new("", false, None).unwrap();
        service.list(&ok).await.unwrap();
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);

        let missing = ListRequest::new("nobody", false, None).unwrap();
        assert!(service.list(&missing).await.is_err());
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_entry_id_is_not_found() {
        let service = service_with(sample_store());
        let req = ReadRequest::new("DEADBEEF").unwrap();
        let err = service.read(&req).await.unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn search_in_missing_folder_names_segment() {
        let service = service_with(sample_store());
        let req = SearchRequest::new(
            "ZRH",
            "user@example.com/Inbox/Sub",
            OutputMode::List,
            DateRange::default(),
            None,
        )
        .unwrap();
        let err = service.search(&req).await.unwrap_err();
        assert!(matches!(err, CoreError::FolderNotFound { segment, .. } if segment == "Sub"));
    }
}
