use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 필사 문장 테이블
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub sentence: String,
    pub author: String,
    pub title: String,
    /// 대표 감정 카테고리
    pub emotion: String,
    /// 상황 태그 (여러 개면 쉼표로 구분)
    pub situation: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
