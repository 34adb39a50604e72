use std::error::Error;
use std::io::{self, Write};
use manhwa_fetch::{AggregateResult, CrawlerConfig, ManhwaCrawler, get_user_input};

fn print_result(result: &AggregateResult) {
    println!("\n=== 结果 ===");
    if let Some(constructed_url) = &result.constructed_url {
        println!("目标: {}", constructed_url);
    }

    if result.success {
        if let Some(message) = &result.message {
            println!("{}", message);
        }
        for image in result.images() {
            println!("  {}  {}", image.name, image.url);
        }
    } else if let Some(error) = &result.error {
        println!("失败: {}", error);
    }
    println!("==============\n");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let crawler = ManhwaCrawler::with_config(CrawlerConfig::from_env())?;
    let json_output = std::env::args().any(|arg| arg == "--json");

    loop {
        println!("\n=== manhwa-fetch ===");
        match get_user_input() {
            Ok(input) => {
                println!("\n正在获取 '{}' 的章节图片...", input.manga_name);
                let result = crawler.run(&input).await;
                if json_output {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print_result(&result);
                }
            }
            Err(e) => {
                println!("输入错误: {}", e);
            }
        }

        print!("\n是否继续获取其他章节? (y/n): ");
        io::stdout().flush()?;
        let mut continue_choice = String::new();
        io::stdin().read_line(&mut continue_choice)?;
        if continue_choice.trim().to_lowercase() != "y" {
            break;
        }
    }

    println!("程序结束。");
    Ok(())
}
