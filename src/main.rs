use alb_log_indexer::config::Config;
use alb_log_indexer::indexer::{BatchIndexer, NdjsonFileWriter};
use alb_log_indexer::process::{ObjectJob, handle_object};
use alb_log_indexer::source::LocalObjectStore;
use anyhow::{Context, Result, bail};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let [config_path, bucket, key] = args.as_slice() else {
        bail!("用法: alb-indexer <config.toml> <bucket> <key>");
    };

    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .with_context(|| format!("读取配置文件失败: {config_path}"))?
    } else {
        Config::default()
    };
    config.apply_env_overrides();
    config.validate()?;
    config.check_writer_support(cfg!(feature = "elasticsearch"))?;

    #[cfg(feature = "logging")]
    {
        use alb_log_indexer::logging::{LogConfig, init_logging};
        init_logging(LogConfig::from_settings(&config.log)?)?;
    }

    let store = LocalObjectStore::new(&config.source.root_dir);
    let indexer = BatchIndexer::new(config.indexer.clone());
    let job = ObjectJob {
        bucket,
        key,
        date: chrono::Utc::now().date_naive(),
        delete_after: config.source.delete_after_index,
    };

    #[cfg(feature = "elasticsearch")]
    if let Some(host) = config.elasticsearch.host.as_deref() {
        use alb_log_indexer::indexer::ElasticsearchWriter;
        use alb_log_indexer::process::handle_object_async;

        let timeout = std::time::Duration::from_secs(config.elasticsearch.timeout_secs);
        let mut writer = ElasticsearchWriter::new(host, timeout)?;
        let runtime = tokio::runtime::Runtime::new()?;
        let stats = runtime.block_on(handle_object_async(&store, &job, &indexer, &mut writer))?;
        println!("索引完成: {stats}");
        return Ok(());
    }

    let output = Path::new(&config.log.log_dir).join("bulk.ndjson");
    let mut writer = NdjsonFileWriter::new(&output)?;
    let stats = handle_object(&store, &job, &indexer, &mut writer)?;
    println!("索引完成: {stats}，请求体已写入 {}", output.display());
    Ok(())
}
