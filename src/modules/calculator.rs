// ABOUTME: Calculator module adding, multiplying, or averaging a list of numbers
// ABOUTME: Declares a one-or-more float positional, a choice option, and a details flag

use async_trait::async_trait;

use crate::args::ParsedArgs;
use crate::engine::ModuleContext;
use crate::registry::ModuleFunction;
use crate::schema::{self, ArgumentRule, ModuleSchema, Nargs, SchemaProvider, ValueType};

pub const MODULE_NAME: &str = "calculator";

pub struct Calculator;

impl SchemaProvider for Calculator {
    fn schema(&self) -> schema::Result<ModuleSchema> {
        Ok(ModuleSchema::new("Simple calculator")
            .argument(
                ArgumentRule::positional("numbers")
                    .nargs(Nargs::OneOrMore)
                    .value_type(ValueType::Float)
                    .help("Numbers to operate on"),
            )
            .argument(
                ArgumentRule::option(&["--operation", "-op"])
                    .choices(["add", "multiply", "average"])
                    .default_value("add")
                    .help("Operation to apply (default: add)"),
            )
            .argument(
                ArgumentRule::option(&["--show-details", "-d"])
                    .flag()
                    .help("Print the inputs alongside the result"),
            ))
    }
}

#[async_trait]
impl ModuleFunction for Calculator {
    async fn execute(&self, args: &ParsedArgs, ctx: &mut ModuleContext) -> anyhow::Result<()> {
        let numbers = args.floats("numbers");
        let operation = args.string("operation").unwrap_or("add");
        let rendered: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();

        ctx.out("🧮 Calculator");
        match operation {
            "add" => {
                let result: f64 = numbers.iter().sum();
                ctx.out(format!("{} = {}", rendered.join(" + "), result));
            }
            "multiply" => {
                let result: f64 = numbers.iter().product();
                ctx.out(format!("{} = {}", rendered.join(" × "), result));
            }
            "average" => {
                if numbers.is_empty() {
                    anyhow::bail!("average needs at least one number");
                }
                let result = numbers.iter().sum::<f64>() / numbers.len() as f64;
                ctx.out(format!("Average: {:.2}", result));
            }
            other => anyhow::bail!("unsupported operation '{}'", other),
        }

        if args.flag("show_details") {
            ctx.out(format!("Numbers: [{}]", rendered.join(", ")));
            ctx.out(format!("Operation: {}", operation));
        }

        Ok(())
    }
}
