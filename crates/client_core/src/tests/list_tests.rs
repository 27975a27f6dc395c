use super::*;
use crate::{
    directory::UNKNOWN_CUSTOMER,
    render::{COLUMN_COUNT, EMPTY_TABLE_TEXT},
    test_support::{customer, order, order_list, Call, FakeBackend, Notice, Op, RecordingNotifier},
};

fn backend() -> Arc<FakeBackend> {
    FakeBackend::new(
        vec![customer(1, "Ana"), customer(2, "Luis")],
        vec![
            order(1, 1, PaymentStatus::Pending, "a"),
            order(2, 2, PaymentStatus::Paid, "b"),
            order(3, 2, PaymentStatus::Pending, "c"),
            order(4, 1, PaymentStatus::Cancelled, "d"),
        ],
    )
}

fn row_ids(list: &OrderList) -> Vec<i64> {
    list.rows()
        .iter()
        .filter_map(TableRow::as_order)
        .filter_map(|row| row.order_id)
        .map(|id| id.0)
        .collect()
}

#[tokio::test]
async fn nothing_is_rendered_before_the_first_load() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let list = order_list(&backend, &notifier);

    assert!(list.rows().is_empty());
    assert!(!list.directory().is_loaded());
    assert_eq!(list.view(), &ListView::All);
}

#[tokio::test]
async fn refresh_of_all_view_renders_every_order() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);

    list.refresh().await.expect("refresh");

    assert_eq!(row_ids(&list), vec![1, 2, 3, 4]);
    assert_eq!(list.orders().len(), 4);
}

#[tokio::test]
async fn empty_backend_renders_placeholder_row() {
    let backend = FakeBackend::new(Vec::new(), Vec::new());
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);

    list.refresh().await.expect("refresh");

    assert_eq!(
        list.rows(),
        &[TableRow::Placeholder {
            text: EMPTY_TABLE_TEXT.to_string(),
            colspan: COLUMN_COUNT,
        }]
    );
}

#[tokio::test]
async fn pending_view_uses_server_filter() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);

    list.show_pending().await.expect("pending");

    assert_eq!(backend.calls(), vec![Call::ListPending]);
    assert_eq!(row_ids(&list), vec![1, 3]);
    assert_eq!(list.view(), &ListView::Pending);
}

#[tokio::test]
async fn status_view_filters_full_list_locally() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);

    list.show_status(PaymentStatus::Cancelled)
        .await
        .expect("filter");

    assert_eq!(backend.calls(), vec![Call::ListAll]);
    assert_eq!(row_ids(&list), vec![4]);
    assert!(list
        .orders()
        .iter()
        .all(|order| order.payment_status == PaymentStatus::Cancelled));
}

#[tokio::test]
async fn refresh_repeats_the_current_view() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);
    list.show_pending().await.expect("pending");

    list.refresh().await.expect("refresh");

    assert_eq!(backend.count(Op::ListPending), 2);
    assert_eq!(backend.count(Op::ListAll), 0);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_rows_and_reports_once() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);
    list.refresh().await.expect("initial");
    let before = list.rows().to_vec();
    backend.set_orders(Vec::new());
    backend.fail(Op::ListAll, Some("boom"));

    let result = list.refresh().await;

    assert!(result.is_err());
    assert_eq!(list.rows(), before.as_slice());
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error(LIST_FAILED_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn failed_pending_and_filter_loads_use_their_own_messages() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);
    backend.fail(Op::ListPending, None);
    backend.fail(Op::ListAll, None);

    let _ = list.show_pending().await;
    let _ = list.show_status(PaymentStatus::Paid).await;

    assert_eq!(
        notifier.errors(),
        vec![
            PENDING_FAILED_MESSAGE.to_string(),
            FILTER_FAILED_MESSAGE.to_string()
        ]
    );
}

#[tokio::test]
async fn directory_failure_keeps_the_previous_snapshot() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);
    list.load_directory().await.expect("first load");
    backend.fail(Op::ListCustomers, None);

    let result = list.load_directory().await;

    assert!(result.is_err());
    assert!(list.directory().is_loaded());
    assert_eq!(list.directory().resolve(shared::domain::CustomerId(2)), "Luis");
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn late_directory_load_relabels_rendered_rows() {
    let backend = backend();
    let notifier = RecordingNotifier::new();
    let mut list = order_list(&backend, &notifier);
    list.refresh().await.expect("orders first");
    let first = list.rows()[0].as_order().expect("row").customer_name.clone();
    assert_eq!(first, UNKNOWN_CUSTOMER);

    list.load_directory().await.expect("directory");

    assert_eq!(list.rows()[0].as_order().expect("row").customer_name, "Ana");
    assert_eq!(backend.count(Op::ListAll), 1);
}
