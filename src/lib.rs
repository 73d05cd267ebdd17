//! MathTutor - 数学辅导平台后端服务
//!
//! 基于 Actix Web 构建，核心是按主题统计掌握度（红/黄/绿）的作业反馈。
//!
//! # 架构
//! - `ai`: LLM 客户端与出题/识图提示词
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `feedback`: 反馈汇总（纯函数）
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod ai;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod feedback;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
