//! Integration tests for Site-Harvest
//!
//! These tests use wiremock to create mock HTTP servers and drive the fetcher
//! and the orchestrator end-to-end.

mod scrape_tests;

use site_harvest::config::{Config, IdentityConfig, OutputConfig, ScraperConfig};
use site_harvest::model::Source;

/// Creates a test configuration with no request delay and a short timeout
pub fn create_test_config(sources: Vec<Source>) -> Config {
    Config {
        scraper: ScraperConfig {
            min_delay: 0.0,
            max_delay: 0.0,
            timeout: 2.0,
            ..ScraperConfig::default()
        },
        identity: IdentityConfig::default(),
        output: OutputConfig::default(),
        sources,
    }
}

pub const DOCUMENT_PAGE: &str = r#"<html><head><title>Herman Melville - Moby-Dick</title></head>
<body>
  <h1>Moby-Dick</h1>
  <h2>Chapter 1</h2>
  <p>Call me Ishmael.</p>
  <p>Some years ago, never mind how long precisely.</p>
  <p>   </p>
  <a href="/chapter/2">Next chapter</a>
  <a href="https://example.com/about">About</a>
</body></html>"#;

pub const QUOTES_PAGE: &str = r#"<html><head><title>Quotes to Scrape</title></head>
<body>
  <div class="quote">
    <span class="text">"The world as we have created it is a process of our thinking."</span>
    <span>by <small class="author">Albert Einstein</small></span>
    <div class="tags">
      <a class="tag" href="/tag/change/">change</a>
      <a class="tag" href="/tag/thinking/">thinking</a>
    </div>
  </div>
  <div class="quote">
    <span class="text">"It is our choices that show what we truly are."</span>
    <span>by <small class="author">J.K. Rowling</small></span>
    <div class="tags"></div>
  </div>
</body></html>"#;

pub const CATALOG_PAGE: &str = r#"<html><head><title>All products | Books to Scrape</title></head>
<body><ol class="row">
  <li><article class="product_pod">
    <p class="star-rating Three"></p>
    <h3><a href="a-light-in-the-attic/index.html" title="A Light in the Attic">A Light in the ...</a></h3>
    <div class="product_price">
      <p class="price_color">£51.77</p>
      <p class="instock availability"><i class="icon-ok"></i> In stock </p>
    </div>
  </article></li>
  <li><article class="product_pod">
    <p class="star-rating One"></p>
    <h3><a href="tipping-the-velvet/index.html" title="Tipping the Velvet">Tipping the Velvet</a></h3>
    <div class="product_price">
      <p class="price_color">£53.74</p>
    </div>
  </article></li>
</ol></body></html>"#;
