use crate::entities::order_entity as orders;
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 创建订单。只校验必填联系字段；状态总是以 new 入库，
    /// 客户端提交的任何状态都不会生效。
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<orders::Model> {
        if request.full_name.trim().is_empty() || request.email.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Missing required fields".to_string(),
            ));
        }

        let now = Utc::now();
        let address = request.shipping_address;

        let model = orders::ActiveModel {
            full_name: Set(request.full_name),
            email: Set(request.email),
            phone: Set(request.phone),
            preferred_communication: Set(request.preferred_communication),
            artwork_type: Set(request.artwork_type),
            medium: Set(request.medium),
            size: Set(request.size),
            color_palette: Set(request.color_palette),
            image_urls: Set(serde_json::json!(request.image_urls)),
            purpose: Set(request.purpose),
            address_line1: Set(address.address_line1),
            address_line2: Set(address.address_line2),
            city: Set(address.city),
            state: Set(address.state),
            postal_code: Set(address.postal_code),
            country: Set(address.country),
            additional_notes: Set(request.additional_notes),
            newsletter: Set(request.newsletter),
            status: Set(OrderStatus::New),
            order_date: Set(request.order_date.unwrap_or(now)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let saved = model.insert(&self.pool).await?;
        log::info!("Order saved successfully with ID: {}", saved.id);

        Ok(saved)
    }

    /// 全量订单列表，按下单时间倒序
    pub async fn list_orders(&self) -> AppResult<Vec<orders::Model>> {
        let items = orders::Entity::find()
            .order_by_desc(orders::Column::OrderDate)
            .all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn get_order(&self, order_id: i64) -> AppResult<orders::Model> {
        orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// 通用部分更新：请求里出现的字段全部覆盖，没有白名单。
    /// id 不存在时返回 NotFound。
    pub async fn update_order(
        &self,
        order_id: i64,
        request: UpdateOrderRequest,
    ) -> AppResult<orders::Model> {
        let mut model = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?
            .into_active_model();

        if let Some(status) = request.status {
            model.status = Set(status);
        }
        if let Some(full_name) = request.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(email) = request.email {
            model.email = Set(email);
        }
        if let Some(phone) = request.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(channel) = request.preferred_communication {
            model.preferred_communication = Set(channel);
        }
        if let Some(artwork_type) = request.artwork_type {
            model.artwork_type = Set(artwork_type);
        }
        if let Some(medium) = request.medium {
            model.medium = Set(medium);
        }
        if let Some(size) = request.size {
            model.size = Set(size);
        }
        if let Some(color_palette) = request.color_palette {
            model.color_palette = Set(Some(color_palette));
        }
        if let Some(image_urls) = request.image_urls {
            model.image_urls = Set(serde_json::json!(image_urls));
        }
        if let Some(purpose) = request.purpose {
            model.purpose = Set(purpose);
        }
        if let Some(address) = request.shipping_address {
            model.address_line1 = Set(address.address_line1);
            model.address_line2 = Set(address.address_line2);
            model.city = Set(address.city);
            model.state = Set(address.state);
            model.postal_code = Set(address.postal_code);
            model.country = Set(address.country);
        }
        if let Some(additional_notes) = request.additional_notes {
            model.additional_notes = Set(Some(additional_notes));
        }
        if let Some(newsletter) = request.newsletter {
            model.newsletter = Set(newsletter);
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model.update(&self.pool).await?;

        Ok(updated)
    }

    /// 管理端统计：状态分布与作品类型分布
    pub async fn get_order_statistics(&self) -> AppResult<OrderStatistics> {
        let total_orders = self.count_with_status(None).await?;
        let new_orders = self.count_with_status(Some(OrderStatus::New)).await?;
        let in_progress_orders = self.count_with_status(Some(OrderStatus::InProgress)).await?;
        let completed_orders = self.count_with_status(Some(OrderStatus::Completed)).await?;
        let cancelled_orders = self.count_with_status(Some(OrderStatus::Cancelled)).await?;

        #[derive(Debug, sea_orm::FromQueryResult)]
        struct TypeCountRow {
            artwork_type: String,
            count: i64,
        }

        let mut rows = orders::Entity::find()
            .select_only()
            .column(orders::Column::ArtworkType)
            .column_as(Expr::val(1).count(), "count")
            .group_by(orders::Column::ArtworkType)
            .into_model::<TypeCountRow>()
            .all(&self.pool)
            .await?;
        rows.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(OrderStatistics {
            total_orders,
            new_orders,
            in_progress_orders,
            completed_orders,
            cancelled_orders,
            orders_by_artwork_type: rows
                .into_iter()
                .map(|row| ArtworkTypeCount {
                    artwork_type: row.artwork_type,
                    count: row.count,
                })
                .collect(),
        })
    }

    async fn count_with_status(&self, status: Option<OrderStatus>) -> AppResult<i64> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct CountRow {
            count: i64,
        }

        let mut query = orders::Entity::find();
        if let Some(status) = status {
            query = query.filter(orders::Column::Status.eq(status));
        }

        let count = query
            .select_only()
            .column_as(Expr::val(1).count(), "count")
            .into_model::<CountRow>()
            .one(&self.pool)
            .await?
            .map(|row| row.count)
            .unwrap_or(0);

        Ok(count)
    }
}
