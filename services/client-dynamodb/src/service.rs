/// DynamoDBサービス
///
/// 各メソッドはSDKコマンドを1回送信し、出力をそのまま返す。
/// 失敗は[`DynamoDbError`](crate::DynamoDbError)に変換される。
use crate::context::DynamoDb;

client_core::define_service! {
    /// DynamoDBの型付きサービス
    ///
    /// `I`はコマンドを送信するクライアントインスタンス（デフォルトはSDKクライアント）。
    pub struct DynamoDbService for DynamoDb, sdk = aws_sdk_dynamodb {
        batch_execute_statement(BatchExecuteStatementInputBuilder) -> BatchExecuteStatementOutput, BatchExecuteStatementError;
        /// 未処理のキーは`unprocessed_keys`に返る（エラーにはならない）
        batch_get_item(BatchGetItemInputBuilder) -> BatchGetItemOutput, BatchGetItemError;
        /// 未処理の項目は`unprocessed_items`に返る（エラーにはならない）
        batch_write_item(BatchWriteItemInputBuilder) -> BatchWriteItemOutput, BatchWriteItemError;
        create_backup(CreateBackupInputBuilder) -> CreateBackupOutput, CreateBackupError;
        create_global_table(CreateGlobalTableInputBuilder) -> CreateGlobalTableOutput, CreateGlobalTableError;
        create_table(CreateTableInputBuilder) -> CreateTableOutput, CreateTableError;
        delete_backup(DeleteBackupInputBuilder) -> DeleteBackupOutput, DeleteBackupError;
        /// 項目を削除する
        ///
        /// 条件式が満たされない場合は`ConditionalCheckFailed`。
        delete_item(DeleteItemInputBuilder) -> DeleteItemOutput, DeleteItemError;
        delete_resource_policy(DeleteResourcePolicyInputBuilder) -> DeleteResourcePolicyOutput, DeleteResourcePolicyError;
        delete_table(DeleteTableInputBuilder) -> DeleteTableOutput, DeleteTableError;
        describe_backup(DescribeBackupInputBuilder) -> DescribeBackupOutput, DescribeBackupError;
        describe_continuous_backups(DescribeContinuousBackupsInputBuilder) -> DescribeContinuousBackupsOutput, DescribeContinuousBackupsError;
        describe_contributor_insights(DescribeContributorInsightsInputBuilder) -> DescribeContributorInsightsOutput, DescribeContributorInsightsError;
        describe_endpoints(DescribeEndpointsInputBuilder) -> DescribeEndpointsOutput, DescribeEndpointsError;
        describe_export(DescribeExportInputBuilder) -> DescribeExportOutput, DescribeExportError;
        describe_global_table(DescribeGlobalTableInputBuilder) -> DescribeGlobalTableOutput, DescribeGlobalTableError;
        describe_global_table_settings(DescribeGlobalTableSettingsInputBuilder) -> DescribeGlobalTableSettingsOutput, DescribeGlobalTableSettingsError;
        describe_import(DescribeImportInputBuilder) -> DescribeImportOutput, DescribeImportError;
        describe_kinesis_streaming_destination(DescribeKinesisStreamingDestinationInputBuilder) -> DescribeKinesisStreamingDestinationOutput, DescribeKinesisStreamingDestinationError;
        describe_limits(DescribeLimitsInputBuilder) -> DescribeLimitsOutput, DescribeLimitsError;
        describe_table(DescribeTableInputBuilder) -> DescribeTableOutput, DescribeTableError;
        describe_table_replica_auto_scaling(DescribeTableReplicaAutoScalingInputBuilder) -> DescribeTableReplicaAutoScalingOutput, DescribeTableReplicaAutoScalingError;
        describe_time_to_live(DescribeTimeToLiveInputBuilder) -> DescribeTimeToLiveOutput, DescribeTimeToLiveError;
        disable_kinesis_streaming_destination(DisableKinesisStreamingDestinationInputBuilder) -> DisableKinesisStreamingDestinationOutput, DisableKinesisStreamingDestinationError;
        enable_kinesis_streaming_destination(EnableKinesisStreamingDestinationInputBuilder) -> EnableKinesisStreamingDestinationOutput, EnableKinesisStreamingDestinationError;
        /// PartiQL文を実行する
        execute_statement(ExecuteStatementInputBuilder) -> ExecuteStatementOutput, ExecuteStatementError;
        execute_transaction(ExecuteTransactionInputBuilder) -> ExecuteTransactionOutput, ExecuteTransactionError;
        export_table_to_point_in_time(ExportTableToPointInTimeInputBuilder) -> ExportTableToPointInTimeOutput, ExportTableToPointInTimeError;
        /// 項目を取得する（存在しない場合は`item`が`None`）
        get_item(GetItemInputBuilder) -> GetItemOutput, GetItemError;
        get_resource_policy(GetResourcePolicyInputBuilder) -> GetResourcePolicyOutput, GetResourcePolicyError;
        import_table(ImportTableInputBuilder) -> ImportTableOutput, ImportTableError;
        list_backups(ListBackupsInputBuilder) -> ListBackupsOutput, ListBackupsError;
        list_contributor_insights(ListContributorInsightsInputBuilder) -> ListContributorInsightsOutput, ListContributorInsightsError;
        list_exports(ListExportsInputBuilder) -> ListExportsOutput, ListExportsError;
        list_global_tables(ListGlobalTablesInputBuilder) -> ListGlobalTablesOutput, ListGlobalTablesError;
        list_imports(ListImportsInputBuilder) -> ListImportsOutput, ListImportsError;
        list_tables(ListTablesInputBuilder) -> ListTablesOutput, ListTablesError;
        list_tags_of_resource(ListTagsOfResourceInputBuilder) -> ListTagsOfResourceOutput, ListTagsOfResourceError;
        /// 項目を書き込む
        ///
        /// 条件式が満たされない場合は`ConditionalCheckFailed`。
        put_item(PutItemInputBuilder) -> PutItemOutput, PutItemError;
        put_resource_policy(PutResourcePolicyInputBuilder) -> PutResourcePolicyOutput, PutResourcePolicyError;
        /// ページングはしない（`last_evaluated_key`を次の入力に渡す）
        query(QueryInputBuilder) -> QueryOutput, QueryError;
        restore_table_from_backup(RestoreTableFromBackupInputBuilder) -> RestoreTableFromBackupOutput, RestoreTableFromBackupError;
        restore_table_to_point_in_time(RestoreTableToPointInTimeInputBuilder) -> RestoreTableToPointInTimeOutput, RestoreTableToPointInTimeError;
        scan(ScanInputBuilder) -> ScanOutput, ScanError;
        tag_resource(TagResourceInputBuilder) -> TagResourceOutput, TagResourceError;
        transact_get_items(TransactGetItemsInputBuilder) -> TransactGetItemsOutput, TransactGetItemsError;
        /// 失敗理由は`TransactionCanceled`の操作エラーの`cancellation_reasons`で参照できる
        transact_write_items(TransactWriteItemsInputBuilder) -> TransactWriteItemsOutput, TransactWriteItemsError;
        untag_resource(UntagResourceInputBuilder) -> UntagResourceOutput, UntagResourceError;
        update_continuous_backups(UpdateContinuousBackupsInputBuilder) -> UpdateContinuousBackupsOutput, UpdateContinuousBackupsError;
        update_contributor_insights(UpdateContributorInsightsInputBuilder) -> UpdateContributorInsightsOutput, UpdateContributorInsightsError;
        update_global_table(UpdateGlobalTableInputBuilder) -> UpdateGlobalTableOutput, UpdateGlobalTableError;
        update_global_table_settings(UpdateGlobalTableSettingsInputBuilder) -> UpdateGlobalTableSettingsOutput, UpdateGlobalTableSettingsError;
        update_item(UpdateItemInputBuilder) -> UpdateItemOutput, UpdateItemError;
        update_kinesis_streaming_destination(UpdateKinesisStreamingDestinationInputBuilder) -> UpdateKinesisStreamingDestinationOutput, UpdateKinesisStreamingDestinationError;
        update_table(UpdateTableInputBuilder) -> UpdateTableOutput, UpdateTableError;
        update_table_replica_auto_scaling(UpdateTableReplicaAutoScalingInputBuilder) -> UpdateTableReplicaAutoScalingOutput, UpdateTableReplicaAutoScalingError;
        update_time_to_live(UpdateTimeToLiveInputBuilder) -> UpdateTimeToLiveOutput, UpdateTimeToLiveError;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DynamoDbClientLayer;
    use crate::error::DynamoDbErrorKind;
    use aws_sdk_dynamodb::error::ProvideErrorMetadata;
    use aws_sdk_dynamodb::operation::put_item::{
        PutItemError, PutItemInput, PutItemOutput, builders::PutItemInputBuilder,
    };
    use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput, builders::QueryInputBuilder};
    use aws_sdk_dynamodb::operation::scan::{ScanInput, ScanOutput, builders::ScanInputBuilder};
    use aws_sdk_dynamodb::operation::transact_write_items::{
        TransactWriteItemsError, TransactWriteItemsInput, builders::TransactWriteItemsInputBuilder,
    };
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, TransactionCanceledException,
    };
    use aws_sdk_dynamodb::types::{AttributeValue, CancellationReason};
    use aws_smithy_runtime::client::http::test_util::capture_request;
    use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
    use aws_smithy_runtime_api::client::result::SdkError;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;
    use aws_smithy_types::error::ErrorMetadata;
    use client_core::testing::MockClient;
    use client_core::{ClientOptions, HandlerOptions, ServiceError};
    use serial_test::serial;
    use std::time::Duration;

    type MockDynamoDb = MockClient<DynamoDb>;

    fn response(status: u16) -> HttpResponse {
        HttpResponse::new(StatusCode::try_from(status).unwrap(), SdkBody::empty())
    }

    fn put_item_args() -> PutItemInputBuilder {
        PutItemInput::builder()
            .table_name("test")
            .item("testAttr", AttributeValue::S("test".to_string()))
    }

    fn mock_service() -> (MockDynamoDb, DynamoDbService<MockDynamoDb>) {
        let mock = MockDynamoDb::new();
        let service = DynamoDbService::new(mock.clone());
        (mock, service)
    }

    #[tokio::test]
    async fn test_put_item_success() {
        let (mock, dynamodb) = mock_service();
        mock.on::<PutItemInputBuilder>()
            .resolves(PutItemOutput::builder().build());

        let result = dynamodb.put_item(put_item_args()).await;

        assert_eq!(result.unwrap(), PutItemOutput::builder().build());
        assert_eq!(mock.received_times::<PutItemInputBuilder>(), 1);
        assert_eq!(mock.received::<PutItemInputBuilder>(), vec![put_item_args()]);
    }

    #[tokio::test]
    async fn test_put_item_generic_error() {
        let (mock, dynamodb) = mock_service();
        mock.on::<PutItemInputBuilder>().rejects_with(|| {
            SdkError::service_error(
                PutItemError::generic(ErrorMetadata::builder().message("test").build()),
                response(400),
            )
        });
        let options = HandlerOptions::with_request_timeout(Duration::from_millis(1000));

        let error = dynamodb
            .with_handler_options(options.clone())
            .put_item(put_item_args())
            .await
            .unwrap_err();

        assert!(matches!(error, ServiceError::Sdk(_)));
        assert_eq!(error.message(), Some("test"));
        assert_eq!(error.kind(), None);
        let source = error
            .downcast_ref::<SdkError<PutItemError, HttpResponse>>()
            .unwrap();
        assert_eq!(source.as_service_error().and_then(|e| e.message()), Some("test"));
        assert_eq!(mock.received_times::<PutItemInputBuilder>(), 1);
        assert!(mock.received_with(&put_item_args()));
        assert_eq!(mock.received_options::<PutItemInputBuilder>(), vec![options]);
    }

    #[tokio::test]
    async fn test_put_item_conditional_check_failed_keeps_item() {
        let (mock, dynamodb) = mock_service();
        mock.on::<PutItemInputBuilder>().rejects_with(|| {
            SdkError::service_error(
                PutItemError::ConditionalCheckFailedException(
                    ConditionalCheckFailedException::builder()
                        .message("The conditional request failed")
                        .item("testAttr", AttributeValue::S("old".to_string()))
                        .meta(
                            ErrorMetadata::builder()
                                .code("ConditionalCheckFailedException")
                                .message("The conditional request failed")
                                .custom("aws_request_id", "req-1")
                                .build(),
                        )
                        .build(),
                ),
                response(400),
            )
        });

        let error = dynamodb
            .put_item(put_item_args().condition_expression("attribute_not_exists(testAttr)"))
            .await
            .unwrap_err();

        assert!(error.is(DynamoDbErrorKind::ConditionalCheckFailed));
        assert_eq!(error.message(), Some("The conditional request failed"));
        assert_eq!(error.code(), Some("ConditionalCheckFailedException"));
        assert_eq!(error.request_id(), Some("req-1"));
        assert_eq!(error.status(), Some(400));

        let Some(PutItemError::ConditionalCheckFailedException(exception)) =
            error.downcast_ref::<PutItemError>()
        else {
            panic!("expected ConditionalCheckFailedException");
        };
        assert_eq!(
            exception.item().and_then(|item| item.get("testAttr")),
            Some(&AttributeValue::S("old".to_string()))
        );
        assert_eq!(mock.received_times::<PutItemInputBuilder>(), 1);
    }

    #[tokio::test]
    async fn test_conditional_check_failed_without_metadata() {
        let (mock, dynamodb) = mock_service();
        mock.on::<PutItemInputBuilder>().rejects_with(|| {
            SdkError::service_error(
                PutItemError::ConditionalCheckFailedException(
                    ConditionalCheckFailedException::builder()
                        .message("The conditional request failed")
                        .item("testAttr", AttributeValue::S("old".to_string()))
                        .build(),
                ),
                response(400),
            )
        });

        let error = dynamodb.put_item(put_item_args()).await.unwrap_err();

        assert_eq!(error.kind(), Some(DynamoDbErrorKind::ConditionalCheckFailed));
        assert_eq!(error.message(), Some("The conditional request failed"));
        assert_eq!(error.code(), Some("ConditionalCheckFailedException"));
        let Some(PutItemError::ConditionalCheckFailedException(exception)) =
            error.downcast_ref::<PutItemError>()
        else {
            panic!("expected ConditionalCheckFailedException");
        };
        assert!(exception.item().is_some_and(|item| item.contains_key("testAttr")));
    }

    #[tokio::test]
    async fn test_transact_write_items_cancellation_reasons() {
        let (mock, dynamodb) = mock_service();
        mock.on::<TransactWriteItemsInputBuilder>().rejects_with(|| {
            SdkError::service_error(
                TransactWriteItemsError::TransactionCanceledException(
                    TransactionCanceledException::builder()
                        .message("Transaction cancelled")
                        .cancellation_reasons(
                            CancellationReason::builder()
                                .code("ConditionalCheckFailed")
                                .build(),
                        )
                        .meta(
                            ErrorMetadata::builder()
                                .code("TransactionCanceledException")
                                .message("Transaction cancelled")
                                .build(),
                        )
                        .build(),
                ),
                response(400),
            )
        });

        let error = dynamodb
            .transact_write_items(TransactWriteItemsInput::builder())
            .await
            .unwrap_err();

        let ServiceError::Exception(exception) = error else {
            panic!("expected exception");
        };
        assert_eq!(exception.kind(), DynamoDbErrorKind::TransactionCanceled);
        let Some(TransactWriteItemsError::TransactionCanceledException(source)) =
            exception.downcast_ref::<TransactWriteItemsError>()
        else {
            panic!("expected TransactionCanceledException");
        };
        assert_eq!(
            source.cancellation_reasons()[0].code(),
            Some("ConditionalCheckFailed")
        );
    }

    #[tokio::test]
    async fn test_unknown_exception_is_generic() {
        let (mock, dynamodb) = mock_service();
        mock.on::<PutItemInputBuilder>().rejects_with(|| {
            SdkError::service_error(
                PutItemError::generic(
                    ErrorMetadata::builder()
                        .code("ValidationException")
                        .message("One or more parameter values were invalid")
                        .build(),
                ),
                response(400),
            )
        });

        let error = dynamodb.put_item(put_item_args()).await.unwrap_err();

        assert!(matches!(error, ServiceError::Sdk(_)));
        assert_eq!(error.code(), Some("ValidationException"));
        assert_eq!(error.status(), Some(400));
    }

    #[tokio::test]
    async fn test_send_any_command() {
        let (mock, dynamodb) = mock_service();
        mock.on::<ScanInputBuilder>()
            .resolves(ScanOutput::builder().count(1).scanned_count(3).build());

        let output = dynamodb
            .send(ScanInput::builder().table_name("test"))
            .await
            .unwrap();

        assert_eq!(output.count(), 1);
        assert_eq!(output.scanned_count(), 3);
        assert_eq!(
            mock.received::<ScanInputBuilder>(),
            vec![ScanInput::builder().table_name("test")]
        );
    }

    #[tokio::test]
    async fn test_responds_with_input() {
        let (mock, dynamodb) = mock_service();
        mock.on::<QueryInputBuilder>().responds_with(|input| {
            let count = if input.get_table_name().as_deref() == Some("events") {
                2
            } else {
                0
            };
            Ok(QueryOutput::builder().count(count).build())
        });

        let events = dynamodb
            .query(QueryInput::builder().table_name("events"))
            .await
            .unwrap();
        let others = dynamodb
            .query(QueryInput::builder().table_name("others"))
            .await
            .unwrap();

        assert_eq!(events.count(), 2);
        assert_eq!(others.count(), 0);
        assert_eq!(mock.received_times::<QueryInputBuilder>(), 2);
    }

    #[tokio::test]
    async fn test_cloned_service_shares_client() {
        let (mock, dynamodb) = mock_service();
        mock.on::<PutItemInputBuilder>()
            .resolves(PutItemOutput::builder().build());

        let cloned = dynamodb.clone();
        dynamodb.put_item(put_item_args()).await.unwrap();
        cloned.put_item(put_item_args()).await.unwrap();

        assert_eq!(mock.received_times::<PutItemInputBuilder>(), 2);
    }

    #[tokio::test]
    async fn test_configurable_service() {
        let options = ClientOptions::new()
            .with_region("eu-west-1")
            .with_credentials("AKID", "SECRET", None)
            .with_endpoint_url("http://localhost:8000")
            .unwrap();

        let dynamodb = DynamoDbService::from_options(&options).await;
        let config = dynamodb.client().client().config();

        assert_eq!(config.region().map(|r| r.as_ref()), Some("eu-west-1"));
    }

    #[tokio::test]
    async fn test_layered_service_initializes_layer_once() {
        let layer = DynamoDbClientLayer::from_options(
            ClientOptions::new()
                .with_region("us-west-2")
                .with_credentials("AKID", "SECRET", None),
        );
        assert!(!layer.is_initialized());

        let first = DynamoDbService::from_layer(&layer).await;
        let second = DynamoDbService::from_layer(&layer).await;

        assert!(layer.is_initialized());
        for dynamodb in [first, second] {
            assert_eq!(
                dynamodb.client().client().config().region().map(|r| r.as_ref()),
                Some("us-west-2")
            );
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_default_service_reads_environment() {
        // 安全性: #[serial]でシリアル実行
        unsafe {
            std::env::set_var("AWS_REGION", "ap-northeast-1");
        }

        let dynamodb = DynamoDbService::from_default_config().await;

        assert_eq!(
            dynamodb.client().client().config().region().map(|r| r.as_ref()),
            Some("ap-northeast-1")
        );

        unsafe {
            std::env::remove_var("AWS_REGION");
        }
    }

    // 環境変数由来の設定と明示的な設定で同じリクエストが送信されること
    #[tokio::test]
    #[serial]
    async fn test_default_and_explicit_config_send_same_request() {
        // 安全性: #[serial]でシリアル実行
        unsafe {
            std::env::set_var("AWS_ACCESS_KEY_ID", "AKID");
            std::env::set_var("AWS_SECRET_ACCESS_KEY", "SECRET");
            std::env::set_var("AWS_REGION", "us-east-1");
        }

        let (default_http, default_request) = capture_request(None);
        let from_env = DynamoDbService::from_options(
            &ClientOptions::new().with_http_client(default_http),
        )
        .await;
        from_env.put_item(put_item_args()).await.unwrap();

        let (explicit_http, explicit_request) = capture_request(None);
        let explicit = DynamoDbService::from_options(
            &ClientOptions::new()
                .with_region("us-east-1")
                .with_credentials("AKID", "SECRET", None)
                .with_http_client(explicit_http),
        )
        .await;
        explicit.put_item(put_item_args()).await.unwrap();

        unsafe {
            std::env::remove_var("AWS_ACCESS_KEY_ID");
            std::env::remove_var("AWS_SECRET_ACCESS_KEY");
            std::env::remove_var("AWS_REGION");
        }

        let default_request = default_request.expect_request();
        let explicit_request = explicit_request.expect_request();

        assert_eq!(default_request.uri(), explicit_request.uri());
        assert_eq!(
            default_request.headers().get("x-amz-target"),
            Some("DynamoDB_20120810.PutItem")
        );
        assert_eq!(
            default_request.headers().get("x-amz-target"),
            explicit_request.headers().get("x-amz-target")
        );

        let body = |bytes: Option<&[u8]>| -> serde_json::Value {
            serde_json::from_slice(bytes.unwrap()).unwrap()
        };
        let expected = serde_json::json!({
            "TableName": "test",
            "Item": { "testAttr": { "S": "test" } }
        });
        assert_eq!(body(default_request.body().bytes()), expected);
        assert_eq!(body(explicit_request.body().bytes()), expected);
    }
}
