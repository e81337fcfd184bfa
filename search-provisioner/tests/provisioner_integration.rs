//! Integration tests for the search provisioner.
//!
//! These tests use the real Provisioner and PipelineRunner over an in-memory
//! search service that records every administrative call.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use search_provisioner::catalog;
use search_provisioner::pipelines::PipelineRunner;
use search_provisioner::provisioner::Provisioner;
use search_provisioner::{DataSourceConnections, ProvisionError};
use search_provisioner_repository::{
    DataSourcesAdmin, IndexersAdmin, IndexesAdmin, SearchAdminError,
};
use search_provisioner_shared::{
    ChangeDetectionPolicy, DataSourceConfig, DataType, FieldDefinition, FieldMapping,
    IndexSchema, IndexerConfig,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    IndexExists(String),
    CreateIndex(String),
    DeleteIndex(String),
    UpsertDataSource(String),
    IndexerExists(String),
    ResetIndexer(String),
    UpsertIndexer(String),
    RunIndexer(String),
}

#[derive(Default)]
struct ServiceState {
    calls: Vec<Call>,
    indexes: BTreeMap<String, IndexSchema>,
    data_sources: BTreeMap<String, DataSourceConfig>,
    indexers: BTreeMap<String, IndexerConfig>,
}

// In-memory search service for testing
#[derive(Default)]
struct MockSearchService {
    state: Mutex<ServiceState>,
    /// Fail the first call that matches.
    fail_on: Option<Call>,
}

impl MockSearchService {
    fn new() -> Self {
        Self::default()
    }

    fn failing_on(call: Call) -> Self {
        Self {
            fail_on: Some(call),
            ..Default::default()
        }
    }

    fn record(&self, call: Call) -> Result<(), SearchAdminError> {
        self.state.lock().unwrap().calls.push(call.clone());
        if self.fail_on.as_ref() == Some(&call) {
            return Err(SearchAdminError::unexpected_status(
                format!("{:?}", call),
                503,
                "service unavailable",
            ));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn index(&self, name: &str) -> Option<IndexSchema> {
        self.state.lock().unwrap().indexes.get(name).cloned()
    }

    fn data_source(&self, name: &str) -> Option<DataSourceConfig> {
        self.state.lock().unwrap().data_sources.get(name).cloned()
    }

    fn indexer(&self, name: &str) -> Option<IndexerConfig> {
        self.state.lock().unwrap().indexers.get(name).cloned()
    }

    fn counts(&self) -> (usize, usize, usize) {
        let state = self.state.lock().unwrap();
        (
            state.indexes.len(),
            state.data_sources.len(),
            state.indexers.len(),
        )
    }

    fn runs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::RunIndexer(name) => Some(name),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl IndexesAdmin for MockSearchService {
    async fn index_exists(&self, name: &str) -> Result<bool, SearchAdminError> {
        self.record(Call::IndexExists(name.to_string()))?;
        Ok(self.state.lock().unwrap().indexes.contains_key(name))
    }

    async fn create_index(&self, schema: &IndexSchema) -> Result<(), SearchAdminError> {
        self.record(Call::CreateIndex(schema.name.clone()))?;
        let mut state = self.state.lock().unwrap();
        if state.indexes.contains_key(&schema.name) {
            return Err(SearchAdminError::unexpected_status(
                "create index",
                409,
                "index already exists",
            ));
        }
        state.indexes.insert(schema.name.clone(), schema.clone());
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchAdminError> {
        self.record(Call::DeleteIndex(name.to_string()))?;
        self.state.lock().unwrap().indexes.remove(name);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DataSourcesAdmin for MockSearchService {
    async fn create_or_update_data_source(
        &self,
        config: &DataSourceConfig,
    ) -> Result<(), SearchAdminError> {
        self.record(Call::UpsertDataSource(config.name.clone()))?;
        self.state
            .lock()
            .unwrap()
            .data_sources
            .insert(config.name.clone(), config.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl IndexersAdmin for MockSearchService {
    async fn indexer_exists(&self, name: &str) -> Result<bool, SearchAdminError> {
        self.record(Call::IndexerExists(name.to_string()))?;
        Ok(self.state.lock().unwrap().indexers.contains_key(name))
    }

    async fn reset_indexer(&self, name: &str) -> Result<(), SearchAdminError> {
        self.record(Call::ResetIndexer(name.to_string()))
    }

    async fn create_or_update_indexer(
        &self,
        config: &IndexerConfig,
    ) -> Result<(), SearchAdminError> {
        self.record(Call::UpsertIndexer(config.name.clone()))?;
        self.state
            .lock()
            .unwrap()
            .indexers
            .insert(config.name.clone(), config.clone());
        Ok(())
    }

    async fn run_indexer(&self, name: &str) -> Result<(), SearchAdminError> {
        self.record(Call::RunIndexer(name.to_string()))
    }
}

fn connections() -> DataSourceConnections {
    DataSourceConnections {
        sql: "Server=tcp:sql.example.net;Database=AdventureWorks;".to_string(),
        table: "DefaultEndpointsProtocol=https;AccountName=tables;".to_string(),
        blob: "DefaultEndpointsProtocol=https;AccountName=blobs;".to_string(),
    }
}

fn provisioner(service: &Arc<MockSearchService>) -> Provisioner {
    Provisioner::new(service.clone())
}

fn runner(service: &Arc<MockSearchService>) -> PipelineRunner {
    PipelineRunner::new(Arc::new(provisioner(service)))
}

#[tokio::test]
async fn test_full_run_provisions_every_resource() {
    let service = Arc::new(MockSearchService::new());

    let report = runner(&service).run_all(&connections()).await.unwrap();

    assert_eq!(
        report.indexes,
        vec!["sql-customers", "storage-users", "sql-blob-index"]
    );
    assert_eq!(
        report.data_sources,
        vec!["azure-sql", "azure-table", "azure-blob"]
    );
    assert_eq!(
        report.indexers,
        vec![
            "azure-sql-indexer",
            "azure-table-indexer",
            "azure-blob-indexer",
            "azure-combined-sql-indexer"
        ]
    );
    assert_eq!(service.counts(), (3, 3, 4));
    assert_eq!(
        service.runs(),
        vec![
            "azure-sql-indexer",
            "azure-blob-indexer",
            "azure-combined-sql-indexer"
        ]
    );
    assert_eq!(service.runs(), report.runs);
}

#[tokio::test]
async fn test_second_run_converges_on_same_state() {
    let service = Arc::new(MockSearchService::new());
    let runner = runner(&service);

    let first = runner.run_all(&connections()).await.unwrap();
    let sql_index = service.index(catalog::SQL_INDEX);
    service.clear_calls();

    let second = runner.run_all(&connections()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(service.counts(), (3, 3, 4));
    assert_eq!(service.index(catalog::SQL_INDEX), sql_index);

    let calls = service.calls();
    for index in ["sql-customers", "storage-users", "sql-blob-index"] {
        assert!(calls.contains(&Call::DeleteIndex(index.to_string())), "{}", index);
    }
    for indexer in [
        "azure-sql-indexer",
        "azure-table-indexer",
        "azure-blob-indexer",
        "azure-combined-sql-indexer",
    ] {
        assert!(calls.contains(&Call::ResetIndexer(indexer.to_string())), "{}", indexer);
    }
}

#[tokio::test]
async fn test_relational_pipeline_on_empty_service() {
    let service = Arc::new(MockSearchService::new());

    runner(&service).run_relational(&connections()).await.unwrap();

    let index = service.index("sql-customers").unwrap();
    assert_eq!(index.fields.len(), 13);
    assert_eq!(index.key_field().unwrap().name, "CustomerID");
    assert_eq!(
        index.cors_options.unwrap().allowed_origins,
        vec!["192.168.1.1".to_string()]
    );

    let data_source = service.data_source("azure-sql").unwrap();
    assert_eq!(data_source.container.name, "SalesLT.Customer");
    assert_eq!(
        data_source.data_change_detection_policy,
        Some(ChangeDetectionPolicy::SqlIntegratedChangeTracking)
    );

    let indexer = service.indexer("azure-sql-indexer").unwrap();
    assert_eq!(indexer.data_source_name, "azure-sql");
    assert_eq!(indexer.target_index_name, "sql-customers");
    assert_eq!(
        indexer.schedule.unwrap().interval,
        Duration::from_secs(24 * 60 * 60)
    );

    assert_eq!(
        service.calls(),
        vec![
            Call::IndexExists("sql-customers".into()),
            Call::CreateIndex("sql-customers".into()),
            Call::UpsertDataSource("azure-sql".into()),
            Call::IndexerExists("azure-sql-indexer".into()),
            Call::UpsertIndexer("azure-sql-indexer".into()),
            Call::RunIndexer("azure-sql-indexer".into()),
        ]
    );
}

#[tokio::test]
async fn test_relational_index_wire_shape() {
    let service = Arc::new(MockSearchService::new());

    runner(&service).run_relational(&connections()).await.unwrap();

    let body = serde_json::to_value(service.index("sql-customers").unwrap()).unwrap();
    assert_eq!(
        body["suggesters"],
        json!([{
            "name": "fieldSuggester",
            "searchMode": "analyzingInfixMatching",
            "sourceFields": ["FirstName", "LastName"]
        }])
    );
    assert_eq!(body["corsOptions"], json!({ "allowedOrigins": ["192.168.1.1"] }));
    assert_eq!(body["fields"][0]["name"], json!("CustomerID"));
    assert_eq!(body["fields"][0]["key"], json!(true));
}

#[tokio::test]
async fn test_table_indexer_is_never_run() {
    let service = Arc::new(MockSearchService::new());

    runner(&service).run_all(&connections()).await.unwrap();

    assert!(service.indexer("azure-table-indexer").is_some());
    assert!(!service
        .calls()
        .contains(&Call::RunIndexer("azure-table-indexer".into())));
}

#[tokio::test]
async fn test_combined_pipeline_reupserts_sql_data_source() {
    let service = Arc::new(MockSearchService::new());

    runner(&service).run_combined(&connections()).await.unwrap();

    let calls = service.calls();
    assert!(calls.contains(&Call::UpsertDataSource("azure-blob".into())));
    assert!(calls.contains(&Call::UpsertDataSource("azure-sql".into())));

    let combined = service.indexer("azure-combined-sql-indexer").unwrap();
    assert_eq!(combined.data_source_name, "azure-sql");
    assert_eq!(combined.target_index_name, "sql-blob-index");
}

#[tokio::test]
async fn test_each_pipeline_reports_what_it_reconciled() {
    let service = Arc::new(MockSearchService::new());
    let runner = runner(&service);

    let relational = runner.run_relational(&connections()).await.unwrap();
    assert_eq!(relational.indexes, vec!["sql-customers"]);
    assert_eq!(relational.data_sources, vec!["azure-sql"]);
    assert_eq!(relational.indexers, vec!["azure-sql-indexer"]);
    assert_eq!(relational.runs, vec!["azure-sql-indexer"]);

    let table = runner.run_table(&connections()).await.unwrap();
    assert_eq!(table.indexes, vec!["storage-users"]);
    assert_eq!(table.data_sources, vec!["azure-table"]);
    assert_eq!(table.indexers, vec!["azure-table-indexer"]);
    assert!(table.runs.is_empty());

    let combined = runner.run_combined(&connections()).await.unwrap();
    assert_eq!(combined.indexes, vec!["sql-blob-index"]);
    assert_eq!(combined.data_sources, vec!["azure-blob"]);
    assert_eq!(
        combined.indexers,
        vec!["azure-blob-indexer", "azure-combined-sql-indexer"]
    );
    assert_eq!(combined.runs, combined.indexers);
}

#[tokio::test]
async fn test_blob_field_mapping_reaches_service_verbatim() {
    let service = Arc::new(MockSearchService::new());

    runner(&service).run_combined(&connections()).await.unwrap();

    let indexer = service.indexer("azure-blob-indexer").unwrap();
    assert_eq!(
        indexer.field_mappings,
        vec![FieldMapping::new("uniqueblobkey", "CustomerID")]
    );
    assert_eq!(
        serde_json::to_value(&indexer).unwrap()["fieldMappings"],
        json!([{ "sourceFieldName": "uniqueblobkey", "targetFieldName": "CustomerID" }])
    );
}

#[tokio::test]
async fn test_existing_indexer_is_reset_before_upsert() {
    let service = Arc::new(MockSearchService::new());
    let provisioner = provisioner(&service);

    provisioner
        .reconcile_indexer(catalog::sql_indexer(), "sql-customers", "azure-sql")
        .await
        .unwrap();
    service.clear_calls();

    provisioner
        .reconcile_indexer(catalog::sql_indexer(), "sql-customers", "azure-sql")
        .await
        .unwrap();

    assert_eq!(
        service.calls(),
        vec![
            Call::IndexerExists("azure-sql-indexer".into()),
            Call::ResetIndexer("azure-sql-indexer".into()),
            Call::UpsertIndexer("azure-sql-indexer".into()),
        ]
    );
}

#[tokio::test]
async fn test_indexer_binds_to_given_names() {
    let service = Arc::new(MockSearchService::new());

    let indexer = provisioner(&service)
        .reconcile_indexer(
            IndexerConfig::new("people-indexer", "placeholder", "placeholder"),
            "people",
            "people-db",
        )
        .await
        .unwrap();

    assert_eq!(indexer.target_index_name, "people");
    assert_eq!(indexer.data_source_name, "people-db");
    assert_eq!(service.indexer("people-indexer"), Some(indexer));
}

#[tokio::test]
async fn test_data_source_never_checks_existence() {
    let service = Arc::new(MockSearchService::new());
    let provisioner = provisioner(&service);

    for _ in 0..2 {
        provisioner
            .reconcile_data_source(catalog::table_data_source("conn"))
            .await
            .unwrap();
    }

    assert_eq!(
        service.calls(),
        vec![
            Call::UpsertDataSource("azure-table".into()),
            Call::UpsertDataSource("azure-table".into()),
        ]
    );
}

#[tokio::test]
async fn test_index_without_key_rejected_before_any_call() {
    let service = Arc::new(MockSearchService::new());
    let schema = IndexSchema::new(
        "people",
        vec![FieldDefinition::new("name", DataType::String).searchable(true)],
    );

    let result = provisioner(&service).reconcile_index(schema).await;

    assert!(matches!(result, Err(SearchAdminError::ValidationError(_))));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_index_with_two_keys_rejected_before_any_call() {
    let service = Arc::new(MockSearchService::new());
    let schema = IndexSchema::new(
        "people",
        vec![
            FieldDefinition::new("id", DataType::String).as_key(),
            FieldDefinition::new("email", DataType::String).as_key(),
        ],
    );

    let result = provisioner(&service).reconcile_index(schema).await;

    assert!(matches!(result, Err(SearchAdminError::ValidationError(_))));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_existing_index_is_deleted_then_created() {
    let service = Arc::new(MockSearchService::new());
    let provisioner = provisioner(&service);

    provisioner
        .reconcile_index(catalog::storage_users_index())
        .await
        .unwrap();
    service.clear_calls();

    let index = provisioner
        .reconcile_index(catalog::storage_users_index())
        .await
        .unwrap();

    assert_eq!(index, catalog::storage_users_index());
    assert_eq!(
        service.calls(),
        vec![
            Call::IndexExists("storage-users".into()),
            Call::DeleteIndex("storage-users".into()),
            Call::CreateIndex("storage-users".into()),
        ]
    );
}

#[tokio::test]
async fn test_remote_failure_aborts_run() {
    let service = Arc::new(MockSearchService::failing_on(Call::UpsertDataSource(
        "azure-table".into(),
    )));

    let result = runner(&service).run_all(&connections()).await;

    match result {
        Err(ProvisionError::SearchAdmin(SearchAdminError::UnexpectedStatus { status, .. })) => {
            assert_eq!(status, 503)
        }
        other => panic!("expected remote failure, got {:?}", other),
    }

    // The relational pipeline completed, the table pipeline stopped at its data source.
    assert!(service.index("sql-customers").is_some());
    assert!(service.index("storage-users").is_some());
    assert!(service.indexer("azure-table-indexer").is_none());
    assert!(service.index("sql-blob-index").is_none());
    assert_eq!(
        service.calls().last(),
        Some(&Call::UpsertDataSource("azure-table".into()))
    );
}

#[tokio::test]
async fn test_failed_existence_check_stops_before_create() {
    let service = Arc::new(MockSearchService::failing_on(Call::IndexExists(
        "sql-customers".into(),
    )));

    let result = runner(&service).run_relational(&connections()).await;

    assert!(result.is_err());
    assert_eq!(
        service.calls(),
        vec![Call::IndexExists("sql-customers".into())]
    );
}
