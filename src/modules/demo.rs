// ABOUTME: Demonstration module showing how a module declares and consumes parameters
// ABOUTME: Echoes its resolved configuration and honours a dry-run switch

use async_trait::async_trait;

use crate::args::ParsedArgs;
use crate::engine::ModuleContext;
use crate::registry::ModuleFunction;
use crate::schema::{self, ArgumentRule, ModuleSchema, Nargs, SchemaProvider};

pub const MODULE_NAME: &str = "demo";

const DEFAULT_OUTPUT_DIR: &str = "/tmp/gtools_output";
const BANNER_WIDTH: usize = 50;

pub struct Demo;

impl SchemaProvider for Demo {
    fn schema(&self) -> schema::Result<ModuleSchema> {
        Ok(ModuleSchema::new("Demo module showing parameter registration")
            .argument(
                ArgumentRule::option(&["--config-file", "-c"])
                    .default_value("default.json")
                    .help("Configuration file path (default: default.json)"),
            )
            .argument(
                ArgumentRule::option(&["--output-dir", "-o"])
                    .default_value(DEFAULT_OUTPUT_DIR)
                    .help("Output directory"),
            )
            .argument(
                ArgumentRule::option(&["--verbose", "-v"])
                    .flag()
                    .help("Enable verbose output"),
            )
            .argument(
                ArgumentRule::option(&["--dry-run"])
                    .flag()
                    .help("Report what would happen without doing it"),
            )
            .argument(
                ArgumentRule::option(&["--items"])
                    .nargs(Nargs::ZeroOrMore)
                    .help("Items to process"),
            ))
    }
}

#[async_trait]
impl ModuleFunction for Demo {
    async fn execute(&self, args: &ParsedArgs, ctx: &mut ModuleContext) -> anyhow::Result<()> {
        let banner = "=".repeat(BANNER_WIDTH);
        let items = args.strings("items");

        ctx.out(&banner);
        ctx.out("Demo module running...");
        ctx.out(format!(
            "Config file: {}",
            args.string("config_file").unwrap_or("default.json")
        ));
        ctx.out(format!(
            "Output directory: {}",
            args.string("output_dir").unwrap_or(DEFAULT_OUTPUT_DIR)
        ));
        ctx.out(format!("Verbose: {}", args.flag("verbose")));
        if items.is_empty() {
            ctx.out("Items: none");
        } else {
            ctx.out(format!("Items: {}", items.join(", ")));
        }

        if args.flag("dry_run") {
            ctx.out("🔄 Dry run, no changes made");
        } else {
            ctx.out("✅ Executing");
        }

        ctx.out("✨ Demo module finished");
        ctx.out(&banner);
        Ok(())
    }
}
