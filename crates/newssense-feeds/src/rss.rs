//! RSS 2.0 item extraction.

use newssense_core::Article;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::FeedError;

/// Parse an RSS document into [`Article`]s, in feed order.
///
/// Reads `<title>`, `<link>` and `<description>` from each `<item>`. The
/// description is kept as-is, markup included; CDATA sections and text
/// around nested tags are joined with single spaces. Items missing a title
/// or a link are skipped. Stops after `max_articles` articles.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the document is not well-formed XML.
pub fn parse_rss_feed(xml: &str, max_articles: usize) -> Result<Vec<Article>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut articles = Vec::new();
    if max_articles == 0 {
        return Ok(articles);
    }

    let mut item: Option<Article> = None;
    let mut in_description = false;
    let mut current_tag = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    "item" => {
                        item = Some(Article::default());
                        in_description = false;
                    }
                    "description" if item.is_some() => in_description = true,
                    _ => {}
                }
                current_tag = name;
            }
            Event::End(e) => match e.name().as_ref() {
                b"description" => in_description = false,
                b"item" => {
                    let Some(article) = item.take() else {
                        continue;
                    };
                    if article.title.is_empty() || article.link.is_empty() {
                        tracing::debug!(title = %article.title, "rss item without title or link skipped");
                        continue;
                    }
                    articles.push(article);
                    if articles.len() >= max_articles {
                        break;
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if let Some(article) = item.as_mut() {
                    let text = e.unescape().unwrap_or_default();
                    absorb(article, &current_tag, in_description, &text);
                }
            }
            Event::CData(e) => {
                if let Some(article) = item.as_mut() {
                    let text = String::from_utf8_lossy(e.as_ref());
                    absorb(article, &current_tag, in_description, text.trim());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(articles)
}

fn absorb(article: &mut Article, tag: &str, in_description: bool, text: &str) {
    if text.is_empty() {
        return;
    }
    let field = if in_description {
        &mut article.summary
    } else {
        match tag {
            "title" => &mut article.title,
            "link" => &mut article.link,
            _ => return,
        }
    };
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>QQQ - Bing News</title>
    <link>https://www.bing.com/news</link>
    <item>
      <title>Tesla misses earnings</title>
      <link>https://news.example.com/tesla</link>
      <description>Tesla Inc reported a 5% drop &amp; weak guidance.</description>
      <pubDate>Thu, 17 Jul 2025 20:00:00 GMT</pubDate>
    </item>
    <item>
      <title><![CDATA[Nasdaq slides & chips fall]]></title>
      <link>https://news.example.com/nasdaq</link>
      <description><![CDATA[<p>Chip stocks <b>dragged</b> the index.</p>]]></description>
    </item>
    <item>
      <title>No link here</title>
      <description>Dropped.</description>
    </item>
    <item>
      <title>Apple &amp; suppliers</title>
      <link>https://news.example.com/apple</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_in_feed_order() {
        let articles = parse_rss_feed(FEED, 10).unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Tesla misses earnings", "Nasdaq slides & chips fall", "Apple & suppliers"]
        );
    }

    #[test]
    fn channel_title_is_not_an_article() {
        let articles = parse_rss_feed(FEED, 10).unwrap();
        assert!(articles.iter().all(|a| a.title != "QQQ - Bing News"));
    }

    #[test]
    fn description_entities_are_decoded() {
        let articles = parse_rss_feed(FEED, 10).unwrap();
        assert_eq!(articles[0].summary, "Tesla Inc reported a 5% drop & weak guidance.");
        assert_eq!(articles[0].link, "https://news.example.com/tesla");
    }

    #[test]
    fn cdata_description_keeps_markup() {
        let articles = parse_rss_feed(FEED, 10).unwrap();
        assert_eq!(
            articles[1].summary,
            "<p>Chip stocks <b>dragged</b> the index.</p>"
        );
    }

    #[test]
    fn missing_description_leaves_summary_empty() {
        let articles = parse_rss_feed(FEED, 10).unwrap();
        assert_eq!(articles[2].summary, "");
    }

    #[test]
    fn nested_description_text_is_joined() {
        let xml = "<rss><channel><item><title>T</title><link>L</link>\
                   <description>Shares <b>fell</b> sharply</description></item></channel></rss>";
        let articles = parse_rss_feed(xml, 10).unwrap();
        assert_eq!(articles[0].summary, "Shares fell sharply");
    }

    #[test]
    fn stops_at_max_articles() {
        assert_eq!(parse_rss_feed(FEED, 1).unwrap().len(), 1);
        assert!(parse_rss_feed(FEED, 0).unwrap().is_empty());
    }

    #[test]
    fn empty_channel_yields_no_articles() {
        let xml = "<rss><channel><title>Nothing</title></channel></rss>";
        assert!(parse_rss_feed(xml, 10).unwrap().is_empty());
    }

    #[test]
    fn mismatched_tags_are_an_error() {
        let xml = "<rss><channel><item><title>T</link></item></channel></rss>";
        assert!(matches!(parse_rss_feed(xml, 10), Err(FeedError::Xml(_))));
    }
}
