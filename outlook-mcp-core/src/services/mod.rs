//! 业务逻辑服务层

mod mail_service;

pub use mail_service::MailService;

use std::sync::Arc;

use crate::error::CoreResult;
use crate::traits::{MailSession, MailStore};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入具体的邮件存储实现。
pub struct ServiceContext {
    /// 邮件存储（脚本桥接或内存夹具）
    pub mail_store: Arc<dyn MailStore>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(mail_store: Arc<dyn MailStore>) -> Self {
        Self { mail_store }
    }

    /// 打开一次调用的会话
    pub async fn open_session(&self) -> CoreResult<Box<dyn MailSession>> {
        self.mail_store.open_session().await
    }
}
