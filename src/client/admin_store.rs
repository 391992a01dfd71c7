use crate::client::gateway::CommissionGateway;
use crate::error::AppResult;
use crate::models::{OrderResponse, OrderStatus};
use crate::utils::{PaginatedResponse, PaginationParams};

/// 管理端列表每页固定10条
pub const ORDERS_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub new: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

/// 管理端订单视图：一次性拉取全量列表后，
/// 搜索、状态过滤、分页都在缓存副本上派生，不重新请求。
pub struct AdminOrderStore {
    orders: Vec<OrderResponse>,
    search_term: String,
    status_filter: StatusFilter,
    current_page: u32,
    detail_order_id: Option<i64>,
}

impl Default for AdminOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminOrderStore {
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            search_term: String::new(),
            status_filter: StatusFilter::All,
            current_page: 1,
            detail_order_id: None,
        }
    }

    /// 拉取全量订单列表（服务端已按下单时间倒序）
    pub async fn load(&mut self, gateway: &dyn CommissionGateway) -> AppResult<()> {
        self.orders = gateway.fetch_orders().await?;
        self.current_page = 1;
        Ok(())
    }

    pub fn orders(&self) -> &[OrderResponse] {
        &self.orders
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// 修改搜索词会把页码重置到第1页
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.current_page = 1;
    }

    /// 修改状态过滤会把页码重置到第1页
    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.current_page = 1;
    }

    /// 搜索在状态过滤之前应用；大小写不敏感，
    /// 匹配姓名、邮箱或订单ID的子串
    pub fn filtered_orders(&self) -> Vec<&OrderResponse> {
        let mut result: Vec<&OrderResponse> = self.orders.iter().collect();

        let term = self.search_term.trim().to_lowercase();
        if !term.is_empty() {
            result.retain(|order| {
                order.full_name.to_lowercase().contains(&term)
                    || order.email.to_lowercase().contains(&term)
                    || order.id.to_string().contains(&term)
            });
        }

        if let StatusFilter::Only(status) = self.status_filter {
            result.retain(|order| order.status == status);
        }

        result
    }

    pub fn total_pages(&self) -> u32 {
        self.page().pagination.total_pages
    }

    /// 当前页的订单与分页信息
    pub fn page(&self) -> PaginatedResponse<OrderResponse> {
        let filtered = self.filtered_orders();
        let total = filtered.len() as i64;

        let params = PaginationParams::new(Some(self.current_page), Some(ORDERS_PER_PAGE));
        let items: Vec<OrderResponse> = filtered
            .into_iter()
            .skip(params.get_offset() as usize)
            .take(params.get_limit() as usize)
            .cloned()
            .collect();

        PaginatedResponse::new(items, &params, total)
    }

    /// 页码被钳制在 [1, total_pages]
    pub fn set_page(&mut self, page: u32) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    pub fn open_detail(&mut self, order_id: i64) {
        self.detail_order_id = self.orders.iter().any(|o| o.id == order_id).then_some(order_id);
    }

    pub fn close_detail(&mut self) {
        self.detail_order_id = None;
    }

    /// 当前打开的详情订单，从缓存列表读取
    pub fn selected_order(&self) -> Option<&OrderResponse> {
        self.detail_order_id
            .and_then(|id| self.orders.iter().find(|o| o.id == id))
    }

    /// 状态变更：请求成功后就地更新缓存条目（详情视图读取同一条目），
    /// 不重新拉取；失败时缓存保持不变，由调用方提示
    pub async fn change_status(
        &mut self,
        gateway: &dyn CommissionGateway,
        order_id: i64,
        status: OrderStatus,
    ) -> AppResult<()> {
        let updated = gateway.update_status(order_id, status).await?;

        if let Some(entry) = self.orders.iter_mut().find(|o| o.id == order_id) {
            *entry = updated;
        }

        Ok(())
    }

    /// 侧栏的状态分布徽标
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for order in &self.orders {
            match order.status {
                OrderStatus::New => counts.new += 1,
                OrderStatus::InProgress => counts.in_progress += 1,
                OrderStatus::Completed => counts.completed += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ContactChannel, CreateOrderRequest, ShippingAddress};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make_order(id: i64, full_name: &str, email: &str, status: OrderStatus) -> OrderResponse {
        OrderResponse {
            id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: None,
            preferred_communication: ContactChannel::Email,
            artwork_type: "painting".to_string(),
            medium: "oil".to_string(),
            size: "medium".to_string(),
            color_palette: None,
            image_urls: Vec::new(),
            purpose: "gift".to_string(),
            shipping_address: ShippingAddress {
                address_line1: "1 Main St".to_string(),
                address_line2: None,
                city: "Lagos".to_string(),
                state: "Lagos".to_string(),
                postal_code: "100001".to_string(),
                country: "Nigeria".to_string(),
            },
            additional_notes: None,
            newsletter: false,
            status,
            order_date: Utc::now() - Duration::minutes(id),
            created_at: None,
            updated_at: None,
        }
    }

    struct MockGateway {
        orders: Vec<OrderResponse>,
        fail_update: bool,
        fetch_calls: AtomicUsize,
    }

    impl MockGateway {
        fn with_orders(orders: Vec<OrderResponse>) -> Self {
            Self {
                orders,
                fail_update: false,
                fetch_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CommissionGateway for MockGateway {
        async fn upload_images(&self, _images: &[String]) -> AppResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn submit_order(&self, _order: &CreateOrderRequest) -> AppResult<i64> {
            Ok(1)
        }

        async fn fetch_orders(&self) -> AppResult<Vec<OrderResponse>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.orders.clone())
        }

        async fn update_status(
            &self,
            order_id: i64,
            status: OrderStatus,
        ) -> AppResult<OrderResponse> {
            if self.fail_update {
                return Err(AppError::ExternalApiError("update failed".to_string()));
            }
            let mut order = self
                .orders
                .iter()
                .find(|o| o.id == order_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
            order.status = status;
            Ok(order)
        }
    }

    async fn loaded_store(gateway: &MockGateway) -> AdminOrderStore {
        let mut store = AdminOrderStore::new();
        store.load(gateway).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_page_size_is_ten() {
        let orders = (1..=25)
            .map(|i| make_order(i, &format!("Customer {i}"), "c@x.com", OrderStatus::New))
            .collect();
        let gateway = MockGateway::with_orders(orders);
        let store = loaded_store(&gateway).await;

        let page = store.page();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let gateway = MockGateway::with_orders(vec![
            make_order(1, "Jane Doe", "jane@x.com", OrderStatus::New),
            make_order(2, "John Smith", "john@y.com", OrderStatus::New),
        ]);
        let mut store = loaded_store(&gateway).await;

        store.set_search_term("JANE");
        assert_eq!(store.filtered_orders().len(), 1);

        store.set_search_term("@y.com");
        assert_eq!(store.filtered_orders().len(), 1);
        assert_eq!(store.filtered_orders()[0].id, 2);

        store.set_search_term("nobody");
        assert!(store.filtered_orders().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_order_id() {
        let gateway = MockGateway::with_orders(vec![
            make_order(105, "Jane Doe", "jane@x.com", OrderStatus::New),
            make_order(206, "John Smith", "john@y.com", OrderStatus::New),
        ]);
        let mut store = loaded_store(&gateway).await;

        store.set_search_term("105");
        assert_eq!(store.filtered_orders().len(), 1);
        assert_eq!(store.filtered_orders()[0].id, 105);
    }

    #[tokio::test]
    async fn test_status_filter_applies_after_search() {
        let gateway = MockGateway::with_orders(vec![
            make_order(1, "Jane Doe", "jane@x.com", OrderStatus::New),
            make_order(2, "Jane Roe", "roe@x.com", OrderStatus::Completed),
            make_order(3, "John Smith", "john@y.com", OrderStatus::Completed),
        ]);
        let mut store = loaded_store(&gateway).await;

        store.set_search_term("jane");
        store.set_status_filter(StatusFilter::Only(OrderStatus::Completed));

        let filtered = store.filtered_orders();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[tokio::test]
    async fn test_filter_changes_reset_page() {
        let orders = (1..=25)
            .map(|i| make_order(i, &format!("Customer {i}"), "c@x.com", OrderStatus::New))
            .collect();
        let gateway = MockGateway::with_orders(orders);
        let mut store = loaded_store(&gateway).await;

        store.set_page(3);
        assert_eq!(store.current_page(), 3);

        store.set_search_term("customer");
        assert_eq!(store.current_page(), 1);

        store.set_page(2);
        store.set_status_filter(StatusFilter::Only(OrderStatus::New));
        assert_eq!(store.current_page(), 1);
    }

    #[tokio::test]
    async fn test_page_navigation_is_clamped() {
        let orders = (1..=15)
            .map(|i| make_order(i, &format!("Customer {i}"), "c@x.com", OrderStatus::New))
            .collect();
        let gateway = MockGateway::with_orders(orders);
        let mut store = loaded_store(&gateway).await;

        store.prev_page();
        assert_eq!(store.current_page(), 1);

        store.set_page(99);
        assert_eq!(store.current_page(), 2);

        store.next_page();
        assert_eq!(store.current_page(), 2);
    }

    #[tokio::test]
    async fn test_change_status_updates_cache_without_refetch() {
        let gateway = MockGateway::with_orders(vec![
            make_order(1, "Jane Doe", "jane@x.com", OrderStatus::New),
            make_order(2, "John Smith", "john@y.com", OrderStatus::New),
        ]);
        let mut store = loaded_store(&gateway).await;
        store.open_detail(1);

        store
            .change_status(&gateway, 1, OrderStatus::Completed)
            .await
            .unwrap();

        assert_eq!(store.orders()[0].status, OrderStatus::Completed);
        assert_eq!(store.orders()[1].status, OrderStatus::New);
        // 详情视图读取的是同一缓存条目
        assert_eq!(
            store.selected_order().unwrap().status,
            OrderStatus::Completed
        );
        // 没有触发重新拉取
        assert_eq!(gateway.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_change_status_failure_leaves_cache_untouched() {
        let mut gateway = MockGateway::with_orders(vec![make_order(
            1,
            "Jane Doe",
            "jane@x.com",
            OrderStatus::New,
        )]);
        gateway.fail_update = true;
        let mut store = loaded_store(&gateway).await;

        assert!(
            store
                .change_status(&gateway, 1, OrderStatus::Cancelled)
                .await
                .is_err()
        );
        assert_eq!(store.orders()[0].status, OrderStatus::New);
    }

    #[tokio::test]
    async fn test_status_counts() {
        let gateway = MockGateway::with_orders(vec![
            make_order(1, "A", "a@x.com", OrderStatus::New),
            make_order(2, "B", "b@x.com", OrderStatus::New),
            make_order(3, "C", "c@x.com", OrderStatus::InProgress),
            make_order(4, "D", "d@x.com", OrderStatus::Cancelled),
        ]);
        let store = loaded_store(&gateway).await;

        let counts = store.status_counts();
        assert_eq!(counts.new, 2);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.completed, 0);
        assert_eq!(counts.cancelled, 1);
    }
}
