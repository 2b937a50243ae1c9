//! JavaScript evaluation scripts
//!
//! Scripts evaluated inside fetched pages. Each is a self-invoking
//! expression so its value is the evaluation result.

/// Document-order walk over text nodes of `<body>`
///
/// Removes script, style and noscript nodes first, then joins every
/// non-empty trimmed text node with newlines.
pub const TEXT_WALK_SCRIPT: &str = r#"
    (() => {
        document.querySelectorAll('script, style, noscript').forEach(el => el.remove());
        const body = document.body;
        if (!body) return '';
        const walker = document.createTreeWalker(body, NodeFilter.SHOW_TEXT, null);
        const segments = [];
        let node;
        while ((node = walker.nextNode())) {
            const text = node.textContent.trim();
            if (text.length > 0) {
                segments.push(text);
            }
        }
        return segments.join('\n');
    })()
"#;

/// Installs a DOM mutation counter on first call and returns its value
///
/// The stability wait polls this and treats an unchanged count over the
/// quiet interval as a settled page.
pub const MUTATION_PROBE_SCRIPT: &str = r#"
    (() => {
        if (typeof window.__stocknewsMutations !== 'number') {
            window.__stocknewsMutations = 0;
            const target = document.documentElement || document;
            new MutationObserver(records => {
                window.__stocknewsMutations += records.length;
            }).observe(target, {
                subtree: true,
                childList: true,
                attributes: true,
                characterData: true
            });
        }
        return window.__stocknewsMutations;
    })()
"#;

/// Registered on every new document before navigation
pub const STEALTH_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
    Object.defineProperty(navigator, 'languages', { get: () => ['zh-CN', 'zh', 'en-US', 'en'] });
    Object.defineProperty(navigator, 'platform', { get: () => 'MacIntel' });
    if (!window.chrome) {
        window.chrome = {};
    }
    if (!window.chrome.runtime) {
        window.chrome.runtime = {
            connect: () => ({
                onMessage: { addListener: () => {}, removeListener: () => {} },
                postMessage: () => {}
            })
        };
    }
"#;
