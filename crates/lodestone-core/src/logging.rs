pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter("info,lodestone_assets=debug,lodestone_core=debug")
        .init();
}
