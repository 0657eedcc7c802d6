// src/core/catalog.rs

//! The static, read-only catalog of every external tool the recon core can drive.
//!
//! Each entry describes the tool's executable, whether it targets a domain or a
//! URL, every option the user may set (grouped for display), and the structural
//! overrides the command builder applies before generic dispatch. Defaults are
//! for display only; the builder never injects them.

use std::collections::HashSet;

use crate::core::error::{Error, Result};
use crate::core::options::{
    Choice, DefaultValue, OptionGroup, OptionSpec, OptionType, Override, ToolDefinition, ToolKind,
};

const WHOIS: ToolDefinition = ToolDefinition {
    id: "whois",
    title: "WHOIS Lookup",
    kind: ToolKind::Domain,
    base: &["whois"],
    groups: &[
        OptionGroup {
            name: "Common flags",
            options: &[
                OptionSpec::boolean("-a", "Search all WHOIS servers (-a)", false),
                OptionSpec::boolean("-A", "Search all WHOIS servers (alternate) (-A)", false),
                OptionSpec::boolean("-b", "Verbose (depends on implementation) (-b)", false),
                OptionSpec::boolean("-f", "Fast output / no recursive lookups (-f)", false),
                OptionSpec::boolean("-g", "Use gTLD WHOIS server (-g)", false),
                OptionSpec::boolean("-i", "Use IANA lookups (-i)", false),
                OptionSpec::boolean("-I", "Disable IDN handling (-I)", false),
                OptionSpec::boolean("-k", "Keep connection open if supported (-k)", false),
                OptionSpec::boolean("-l", "Disable referral lookups (-l)", false),
                OptionSpec::boolean("-m", "Disable recursive lookups (-m)", false),
                OptionSpec::boolean("-P", "Disable partial output trimming (-P)", false),
                OptionSpec::boolean("-Q", "Quick mode (-Q)", false),
                OptionSpec::boolean("-r", "Disable following referrals (-r)", false),
                OptionSpec::boolean("-R", "Recursively query related servers (-R)", false),
                OptionSpec::boolean("-S", "Disable caching (if supported) (-S)", false),
            ],
        },
        OptionGroup {
            name: "Server / Region",
            options: &[
                OptionSpec::choice(
                    "__server_mode__",
                    "Server selection (choose ONE)",
                    &[
                        Choice::new("Default behavior", ""),
                        Choice::new("Use country code server (-c <cc>)", "country"),
                        Choice::new("Use specific WHOIS host (-h <hostname>)", "host"),
                    ],
                    "",
                ),
                OptionSpec::text("-c", "Country code (e.g., us, uk, de)"),
                OptionSpec::text("-h", "WHOIS server hostname"),
                OptionSpec::int("-p", "WHOIS port (-p <port>)", 0, 1, 65535),
            ],
        },
    ],
    overrides: &[(
        "__server_mode__",
        Override::ServerModeSelector { suppresses: &[("country", "-h"), ("host", "-c")] },
    )],
};

const DNS_RECORD_TYPES: &[Choice] = &[
    Choice::plain("A"),
    Choice::plain("AAAA"),
    Choice::plain("CNAME"),
    Choice::plain("MX"),
    Choice::plain("NS"),
    Choice::plain("SOA"),
    Choice::plain("TXT"),
    Choice::plain("SRV"),
    Choice::plain("PTR"),
    Choice::plain("CAA"),
];

const DNS_CLASSES: &[Choice] = &[Choice::plain("IN"), Choice::plain("CH"), Choice::plain("HS")];

const NSLOOKUP: ToolDefinition = ToolDefinition {
    id: "nslookup",
    title: "NSLookup",
    kind: ToolKind::Domain,
    base: &["nslookup"],
    groups: &[
        OptionGroup {
            name: "Query basics",
            options: &[
                OptionSpec::choice("-type", "Record type", DNS_RECORD_TYPES, "A"),
                OptionSpec::choice("-class", "Query class", DNS_CLASSES, "IN"),
            ],
        },
        OptionGroup {
            name: "Resolver behavior",
            options: &[
                OptionSpec::boolean("-recurse", "Recursion on (-recurse)", true),
                OptionSpec::boolean("-nosearch", "Disable search list (-nosearch)", false),
                OptionSpec::boolean("-search", "Use search list (-search)", false),
                OptionSpec::boolean("-vc", "Use TCP (-vc)", false),
            ],
        },
        OptionGroup {
            name: "Timeouts / retries",
            options: &[
                OptionSpec::int("-timeout", "Timeout (seconds)", 2, 1, 60),
                OptionSpec::int("-retry", "Retries", 1, 0, 10),
                OptionSpec::int("-port", "DNS server port", 53, 1, 65535),
            ],
        },
        OptionGroup {
            name: "Output / debugging",
            options: &[
                OptionSpec::boolean("-debug", "Debug (-debug)", false),
                OptionSpec::boolean("-d2", "Extra debug (-d2)", false),
                OptionSpec::boolean("-sil", "Silent (less output) (-sil)", false),
            ],
        },
        OptionGroup {
            name: "Advanced",
            options: &[
                OptionSpec::text("-domain", "Default domain (-domain <name>)"),
                OptionSpec::text("-srchlist", "Search list (-srchlist <a/b/c>)"),
            ],
        },
        OptionGroup {
            name: "Optional DNS server",
            options: &[OptionSpec::text("__server__", "DNS Server (optional)")],
        },
    ],
    overrides: &[("__server__", Override::TrailingServer)],
};

const DIG: ToolDefinition = ToolDefinition {
    id: "dig",
    title: "DIG (DNS Lookup)",
    kind: ToolKind::Domain,
    base: &["dig"],
    groups: &[
        OptionGroup {
            name: "Query basics",
            options: &[
                OptionSpec::choice(
                    "-t",
                    "Record type",
                    &[
                        Choice::plain("A"),
                        Choice::plain("AAAA"),
                        Choice::plain("ANY"),
                        Choice::plain("CNAME"),
                        Choice::plain("MX"),
                        Choice::plain("NS"),
                        Choice::plain("SOA"),
                        Choice::plain("TXT"),
                        Choice::plain("SRV"),
                        Choice::plain("PTR"),
                        Choice::plain("CAA"),
                    ],
                    "A",
                ),
                OptionSpec::choice("-c", "Query class", DNS_CLASSES, "IN"),
                OptionSpec::boolean("-x", "Reverse lookup (-x)", false),
            ],
        },
        OptionGroup {
            name: "Transport & protocol",
            options: &[
                OptionSpec::boolean("-4", "IPv4 only (-4)", false),
                OptionSpec::boolean("-6", "IPv6 only (-6)", false),
                OptionSpec::boolean("+tcp", "Force TCP (+tcp)", false),
                OptionSpec::boolean("+notcp", "Disable TCP (+notcp)", false),
            ],
        },
        OptionGroup {
            name: "Output formatting",
            options: &[
                OptionSpec::boolean("+short", "Short answer only (+short)", false),
                OptionSpec::boolean("+noall", "Disable all sections (+noall)", false),
                OptionSpec::boolean("+answer", "Show answer section (+answer)", false),
                OptionSpec::boolean("+authority", "Show authority section (+authority)", false),
                OptionSpec::boolean("+additional", "Show additional section (+additional)", false),
                OptionSpec::boolean("+stats", "Show query stats (+stats)", false),
            ],
        },
        OptionGroup {
            name: "DNS behavior",
            options: &[
                OptionSpec::boolean("+recurse", "Recursive query (+recurse)", true),
                OptionSpec::boolean("+norecurse", "Disable recursion (+norecurse)", false),
                OptionSpec::boolean("+trace", "Trace delegation path (+trace)", false),
                OptionSpec::boolean("+dnssec", "Request DNSSEC records (+dnssec)", false),
            ],
        },
        OptionGroup {
            name: "Timeouts & retries",
            options: &[
                OptionSpec::int("+time", "Query timeout (seconds)", 5, 1, 60),
                OptionSpec::int("+tries", "Retry attempts", 3, 1, 10),
            ],
        },
        OptionGroup {
            name: "Advanced",
            options: &[
                OptionSpec::text("@", "DNS server (@server)"),
                OptionSpec::int("+bufsize", "EDNS buffer size (+bufsize)", 1232, 512, 4096),
            ],
        },
    ],
    overrides: &[("@", Override::PrefixedServer { prefix: "@" })],
};

const NMAP: ToolDefinition = ToolDefinition {
    id: "nmap",
    title: "Nmap",
    kind: ToolKind::Domain,
    base: &["nmap"],
    groups: &[
        OptionGroup {
            name: "Target Specification",
            options: &[
                OptionSpec::text("-iL", "Input list (-iL <file>)"),
                OptionSpec::int("-iR", "Random targets (-iR <num>)", 0, 0, 1_000_000),
                OptionSpec::text("--exclude", "Exclude (--exclude a,b,c)"),
                OptionSpec::text("--excludefile", "Exclude file (--excludefile <file>)"),
            ],
        },
        OptionGroup {
            name: "Host Discovery",
            options: &[
                OptionSpec::boolean("-sL", "List scan (-sL)", false),
                OptionSpec::boolean("-sn", "Ping scan (-sn)", false),
                OptionSpec::boolean("-Pn", "Treat hosts as online (-Pn)", false),
                OptionSpec::boolean("--traceroute", "Traceroute (--traceroute)", false),
                OptionSpec::boolean("-n", "Never resolve DNS (-n)", false),
                OptionSpec::boolean("-R", "Always resolve DNS (-R)", false),
                OptionSpec::text("--dns-servers", "DNS servers (--dns-servers a,b,c)"),
                OptionSpec::boolean("--system-dns", "Use system DNS (--system-dns)", false),
                OptionSpec::text("-PS", "TCP SYN discovery (-PS<ports>)"),
                OptionSpec::text("-PA", "TCP ACK discovery (-PA<ports>)"),
                OptionSpec::text("-PU", "UDP discovery (-PU<ports>)"),
                OptionSpec::text("-PY", "SCTP discovery (-PY<ports>)"),
                OptionSpec::boolean("-PE", "ICMP echo (-PE)", false),
                OptionSpec::boolean("-PP", "ICMP timestamp (-PP)", false),
                OptionSpec::boolean("-PM", "ICMP netmask (-PM)", false),
                OptionSpec::text("-PO", "IP protocol ping (-PO<proto>)"),
            ],
        },
        OptionGroup {
            name: "Scan Technique",
            options: &[
                OptionSpec::choice(
                    "__scan_type__",
                    "Technique",
                    &[
                        Choice::new("Default", ""),
                        Choice::new("SYN (-sS)", "-sS"),
                        Choice::new("Connect (-sT)", "-sT"),
                        Choice::new("ACK (-sA)", "-sA"),
                        Choice::new("Window (-sW)", "-sW"),
                        Choice::new("Maimon (-sM)", "-sM"),
                        Choice::new("UDP (-sU)", "-sU"),
                        Choice::new("Null (-sN)", "-sN"),
                        Choice::new("FIN (-sF)", "-sF"),
                        Choice::new("Xmas (-sX)", "-sX"),
                        Choice::new("SCTP INIT (-sY)", "-sY"),
                        Choice::new("SCTP COOKIE (-sZ)", "-sZ"),
                        Choice::new("IP protocol (-sO)", "-sO"),
                    ],
                    "",
                ),
                OptionSpec::text("--scanflags", "Custom scan flags (--scanflags <flags>)"),
                OptionSpec::text("-sI", "Idle scan (-sI <zombie[:port]>)"),
                OptionSpec::text("-b", "FTP bounce (-b <ftp relay>)"),
            ],
        },
        OptionGroup {
            name: "Ports",
            options: &[
                OptionSpec::text("-p", "Ports (-p <ranges>)"),
                OptionSpec::text("--exclude-ports", "Exclude ports (--exclude-ports <ranges>)"),
                OptionSpec::boolean("-F", "Fast mode (-F)", false),
                OptionSpec::boolean("-r", "Sequential (-r)", false),
                OptionSpec::int("--top-ports", "Top ports (--top-ports <n>)", 0, 0, 5000),
                OptionSpec::text("--port-ratio", "Port ratio (--port-ratio <ratio>)"),
            ],
        },
        OptionGroup {
            name: "Detection (Version / Scripts / OS)",
            options: &[
                OptionSpec::boolean("-sV", "Version detection (-sV)", false),
                OptionSpec::int("--version-intensity", "Version intensity (0-9)", 0, 0, 9),
                OptionSpec::boolean("-sC", "Default scripts (-sC)", false),
                OptionSpec::text("--script", "Scripts (--script <list>)"),
                OptionSpec::text("--script-args", "Script args (--script-args k=v,...)"),
                OptionSpec::boolean("-O", "OS detection (-O)", false),
                OptionSpec::boolean("--osscan-guess", "OS guess (--osscan-guess)", false),
            ],
        },
        OptionGroup {
            name: "Timing",
            options: &[
                OptionSpec::int("-T", "Timing (-T0..5)", 0, 0, 5),
                OptionSpec::int("--max-retries", "Max retries (--max-retries <n>)", 0, 0, 50),
                OptionSpec::text("--host-timeout", "Host timeout (--host-timeout <time>)"),
                OptionSpec::int("--min-rate", "Min rate (--min-rate <n>)", 0, 0, 1_000_000),
                OptionSpec::int("--max-rate", "Max rate (--max-rate <n>)", 0, 0, 1_000_000),
            ],
        },
        OptionGroup {
            name: "Output & Verbosity",
            options: &[
                OptionSpec::count("-v", "Verbosity (-v / -vv / ...)").bounded(0, 5),
                OptionSpec::count("-d", "Debug (-d / -dd / ...)").bounded(0, 5),
                OptionSpec::boolean("--reason", "Show reasons (--reason)", false),
                OptionSpec::boolean("--open", "Only open (--open)", false),
                OptionSpec::boolean("--packet-trace", "Packet trace (--packet-trace)", false),
            ],
        },
        OptionGroup {
            name: "Misc",
            options: &[
                OptionSpec::boolean("-6", "IPv6 (-6)", false),
                OptionSpec::boolean("-A", "Aggressive (-A)", false),
                OptionSpec::boolean("--privileged", "Assume privileged (--privileged)", false),
                OptionSpec::boolean("--unprivileged", "Assume unprivileged (--unprivileged)", false),
            ],
        },
    ],
    overrides: &[],
};

const CURL: ToolDefinition = ToolDefinition {
    id: "curl",
    title: "curl (HTTP Request)",
    kind: ToolKind::Url,
    base: &["curl"],
    groups: &[
        OptionGroup {
            name: "Request basics",
            options: &[
                OptionSpec::boolean("-I", "HEAD request (headers only) (-I)", true),
                OptionSpec::boolean("-L", "Follow redirects (-L)", true),
                OptionSpec::choice(
                    "-X",
                    "HTTP method (-X)",
                    &[
                        Choice::plain("GET"),
                        Choice::plain("POST"),
                        Choice::plain("PUT"),
                        Choice::plain("PATCH"),
                        Choice::plain("DELETE"),
                        Choice::plain("OPTIONS"),
                        Choice::plain("HEAD"),
                    ],
                    "GET",
                ),
                OptionSpec::boolean("--compressed", "Request compressed response (--compressed)", true),
                OptionSpec::text("-A", "User-Agent (-A)"),
            ],
        },
        OptionGroup {
            name: "Headers",
            options: &[
                OptionSpec::text("-H", "Add header (-H)  (example: 'Accept: */*')"),
                OptionSpec::text("-e", "Referer (-e)"),
                OptionSpec::text("-b", "Cookie (-b)  (example: 'key=value')"),
            ],
        },
        OptionGroup {
            name: "Body / data",
            options: &[
                OptionSpec::text("-d", "Data (-d)  (implies POST unless -X set)"),
                OptionSpec::text("--data-urlencode", "URL-encode data (--data-urlencode)"),
                OptionSpec::text("-F", "Multipart form (-F)  (example: 'a=1')"),
                OptionSpec::text("--json", "JSON body (--json)  (example: '{\"a\":1}')"),
            ],
        },
        OptionGroup {
            name: "Auth",
            options: &[
                OptionSpec::text("-u", "Basic auth (-u)  (user:pass)"),
                OptionSpec::text("-H_AUTH", "Bearer token (adds Authorization header)"),
                OptionSpec::boolean("--anyauth", "Try any auth method (--anyauth)", false),
            ],
        },
        OptionGroup {
            name: "TLS / HTTPS",
            options: &[
                OptionSpec::boolean("-k", "Insecure (skip TLS verify) (-k)", false),
                OptionSpec::boolean("--http1.1", "Force HTTP/1.1 (--http1.1)", false),
                OptionSpec::boolean("--http2", "Force HTTP/2 (--http2)", false),
                OptionSpec::boolean("--tlsv1.2", "Force TLS 1.2 (--tlsv1.2)", false),
                OptionSpec::boolean("--tlsv1.3", "Force TLS 1.3 (--tlsv1.3)", false),
            ],
        },
        OptionGroup {
            name: "Output / verbosity",
            options: &[
                OptionSpec::boolean("-v", "Verbose (-v)", false),
                OptionSpec::boolean("-i", "Include response headers (-i)", false),
                OptionSpec::boolean("-s", "Silent (-s)", false),
                OptionSpec::boolean("-S", "Show errors (-S)", false),
                OptionSpec::text("-o", "Write output to file (-o) (container path)"),
            ],
        },
        OptionGroup {
            name: "Timeouts / limits",
            options: &[
                OptionSpec::int("--connect-timeout", "Connect timeout seconds", 10, 1, 120),
                OptionSpec::int("-m", "Max time seconds (-m)", 30, 1, 600),
                OptionSpec::int("--max-redirs", "Max redirects (--max-redirs)", 10, 0, 50),
            ],
        },
    ],
    overrides: &[("-H_AUTH", Override::BearerToken { header_flag: "-H" })],
};

const WHATWEB: ToolDefinition = ToolDefinition {
    id: "whatweb",
    title: "WhatWeb Fingerprint",
    kind: ToolKind::Url,
    base: &["whatweb"],
    groups: &[
        OptionGroup {
            name: "Aggression",
            options: &[OptionSpec::int(
                "-a",
                "Aggression level (-a)  [1=stealthy, 3=aggressive, 4=heavy]",
                1,
                1,
                4,
            )],
        },
        OptionGroup {
            name: "HTTP options",
            options: &[
                OptionSpec::text("-U", "User-Agent (-U)"),
                OptionSpec::text("-H", "Add header (-H)  (example: 'Foo: Bar')"),
                OptionSpec::text("-H_AUTH", "Bearer token (adds Authorization header)"),
                OptionSpec::choice(
                    "--follow-redirect",
                    "Follow redirects (--follow-redirect)",
                    &[
                        Choice::plain("never"),
                        Choice::plain("http-only"),
                        Choice::plain("meta-only"),
                        Choice::plain("same-site"),
                        Choice::plain("always"),
                    ],
                    "always",
                ),
                OptionSpec::int("--max-redirects", "Max redirects (--max-redirects)", 10, 0, 50),
            ],
        },
        OptionGroup {
            name: "Authentication / Cookies",
            options: &[
                OptionSpec::text("-u", "HTTP basic auth (-u)  (user:password)"),
                OptionSpec::text("-c", "Cookie (-c)  (example: 'name=value; name2=value2')"),
                OptionSpec::text("--cookie-jar", "Cookie jar (--cookie-jar)  (container path)"),
                OptionSpec::boolean("--no-cookies", "Disable automatic cookie handling (--no-cookies)", false),
            ],
        },
        OptionGroup {
            name: "Proxy",
            options: &[
                OptionSpec::text("--proxy", "Proxy host:port (--proxy)"),
                OptionSpec::text("--proxy-user", "Proxy user:pass (--proxy-user)"),
            ],
        },
        OptionGroup {
            name: "Plugins",
            options: &[
                OptionSpec::boolean("-l", "List all plugins (-l)", false),
                OptionSpec::text("-I", "Info plugins (-I) optional search term"),
                OptionSpec::text("--search-plugins", "Search plugins (--search-plugins)"),
                OptionSpec::text("-p", "Select plugins (-p)  (comma list, supports +/-)"),
                OptionSpec::text("-g", "Grep output (-g)  (string or /regex/)"),
                OptionSpec::text("--custom-plugin", "Custom plugin (--custom-plugin)"),
                OptionSpec::text("--dorks", "List Google dorks (--dorks)  (plugin name)"),
            ],
        },
        OptionGroup {
            name: "Output / Logging",
            options: &[
                OptionSpec::boolean("-v", "Verbose (-v)", false),
                OptionSpec::boolean("-q", "Quiet (-q)", false),
                OptionSpec::boolean("--no-errors", "Suppress error messages (--no-errors)", false),
                OptionSpec::choice(
                    "--color",
                    "Color output (--color)",
                    &[Choice::plain("auto"), Choice::plain("always"), Choice::plain("never")],
                    "auto",
                ),
                OptionSpec::text("--log-brief", "Log brief (--log-brief)  (file path)"),
                OptionSpec::text("--log-verbose", "Log verbose (--log-verbose)  (file path)"),
                OptionSpec::text("--log-errors", "Log errors (--log-errors)  (file path)"),
                OptionSpec::text("--log-xml", "Log XML (--log-xml)  (file path)"),
                OptionSpec::text("--log-json", "Log JSON (--log-json)  (file path)"),
                OptionSpec::text("--log-json-verbose", "Log JSON verbose (--log-json-verbose)  (file path)"),
            ],
        },
        OptionGroup {
            name: "Performance & timeouts",
            options: &[
                OptionSpec::int("-t", "Max threads (-t)", 25, 1, 200),
                OptionSpec::int("--open-timeout", "Open timeout seconds (--open-timeout)", 15, 1, 300),
                OptionSpec::int("--read-timeout", "Read timeout seconds (--read-timeout)", 30, 1, 600),
                OptionSpec::int("--wait", "Wait between connections seconds (--wait)", 0, 0, 60),
            ],
        },
    ],
    overrides: &[
        ("-H_AUTH", Override::BearerToken { header_flag: "-H" }),
        ("-l", Override::ShortCircuitWhenTruthy),
    ],
};

const SUBFINDER: ToolDefinition = ToolDefinition {
    id: "subfinder",
    title: "Subdomain Enumeration (subfinder)",
    kind: ToolKind::Domain,
    base: &["subfinder"],
    groups: &[
        OptionGroup {
            name: "Targets",
            options: &[
                OptionSpec::text("-d", "Domain (-d) (optional override)"),
                OptionSpec::text("-dL", "Domain list file (-dL) (container path)"),
            ],
        },
        OptionGroup {
            name: "Sources",
            options: &[
                OptionSpec::text("-s", "Specific sources (-s) (comma list: crtsh,github)"),
                OptionSpec::text("-es", "Exclude sources (-es) (comma list: alienvault,zoomeye)"),
                OptionSpec::boolean("-recursive", "Recursive sources only (-recursive)", false),
                OptionSpec::boolean("-all", "Use all sources (-all) (slow)", false),
                OptionSpec::boolean("-ls", "List available sources (-ls)", false),
            ],
        },
        OptionGroup {
            name: "Filtering / Matching",
            options: &[
                OptionSpec::text("-m", "Match (-m) (subdomain / file / comma list)"),
                OptionSpec::text("-f", "Filter (-f) (subdomain / file / comma list)"),
                OptionSpec::text("-ei", "Exclude IPs (-ei) (comma list)"),
            ],
        },
        OptionGroup {
            name: "Resolvers / Performance",
            options: &[
                OptionSpec::int("-rl", "Rate limit (-rl) requests/sec", 0, 0, 10000),
                OptionSpec::int("-timeout", "Timeout seconds (-timeout)", 30, 1, 600),
                OptionSpec::int("-max-time", "Max time minutes (-max-time)", 10, 1, 120),
                OptionSpec::text("-r", "Resolvers (-r) (comma list)"),
                OptionSpec::text("-rL", "Resolvers file (-rL) (container path)"),
            ],
        },
        OptionGroup {
            name: "Active / IP options",
            options: &[
                OptionSpec::boolean("-nW", "Active mode (-nW) (active subdomains only)", false),
                OptionSpec::int("-t", "Goroutines (-t) (active only)", 10, 1, 500),
                OptionSpec::boolean("-oI", "Include host IP (-oI) (active only)", false),
            ],
        },
        OptionGroup {
            name: "Output / Logging",
            options: &[
                OptionSpec::boolean("-silent", "Silent output (-silent)", true),
                OptionSpec::boolean("-v", "Verbose (-v)", false),
                OptionSpec::boolean("-nc", "No color (-nc)", false),
                OptionSpec::text("-o", "Output file (-o) (container path)"),
                OptionSpec::text("-oD", "Output directory (-oD) (dL only)"),
                OptionSpec::boolean("-oJ", "JSONL output (-oJ)", false),
                OptionSpec::boolean("-cs", "Collect sources (-cs) (json only)", false),
            ],
        },
        OptionGroup {
            name: "Config / Proxy",
            options: &[
                OptionSpec::text("-config", "Config file (-config) (container path)"),
                OptionSpec::text("-pc", "Provider config (-pc) (container path)"),
                OptionSpec::text("-proxy", "HTTP proxy (-proxy)"),
            ],
        },
        OptionGroup {
            name: "Info",
            options: &[OptionSpec::boolean("-version", "Show version (-version)", false)],
        },
    ],
    overrides: &[
        ("-d", Override::TargetOverride),
        ("-dL", Override::ShortCircuitWhenSet),
        ("-ls", Override::ShortCircuitWhenTruthy),
    ],
};

const WAFW00F: ToolDefinition = ToolDefinition {
    id: "wafw00f",
    title: "WAF Detection (WAFW00F)",
    kind: ToolKind::Url,
    base: &["wafw00f"],
    groups: &[
        OptionGroup {
            name: "Basics",
            options: &[
                OptionSpec::boolean("-a", "Find all matching WAFs (-a / --findall)", false),
                OptionSpec::boolean("-r", "Do not follow redirects (-r / --noredirect)", false),
                OptionSpec::count("-v", "Verbosity level (-v, repeatable)").bounded(0, 3),
                OptionSpec::boolean("--no-colors", "Disable ANSI colors (--no-colors)", true),
            ],
        },
        OptionGroup {
            name: "Target Control",
            options: &[
                OptionSpec::text("-t", "Test one specific WAF (-t / --test)"),
                OptionSpec::text("-i", "Input file of targets (-i / --input-file) (container path)"),
                OptionSpec::boolean("-l", "List detectable WAFs (-l / --list)", false),
            ],
        },
        OptionGroup {
            name: "Networking",
            options: &[
                OptionSpec::text("-p", "Proxy (-p / --proxy) (http://host:8080 or socks5://...)"),
                OptionSpec::int("-T", "Timeout seconds (-T / --timeout)", 15, 1, 600),
            ],
        },
        OptionGroup {
            name: "Output",
            options: &[
                OptionSpec::text("-o", "Write output file (-o / --output) (csv/json/txt by extension)"),
                OptionSpec::choice(
                    "-f",
                    "Force output format (-f / --format)",
                    &[Choice::plain("csv"), Choice::plain("json"), Choice::plain("text")],
                    "",
                ),
            ],
        },
        OptionGroup {
            name: "Headers",
            options: &[OptionSpec::text("-H", "Headers file (-H / --headers) (container path)")],
        },
        OptionGroup {
            name: "Info",
            options: &[OptionSpec::boolean("-V", "Print version (-V / --version)", false)],
        },
    ],
    overrides: &[
        ("-i", Override::ShortCircuitWhenSet),
        ("-l", Override::ShortCircuitWhenTruthy),
    ],
};

/// The master list of all catalogued tools, in display order.
static TOOLS: &[ToolDefinition] = &[WHOIS, NSLOOKUP, DIG, NMAP, CURL, WHATWEB, SUBFINDER, WAFW00F];

/// Every catalogued tool, in display order.
pub fn all() -> &'static [ToolDefinition] {
    TOOLS
}

/// `(id, title)` pairs for a tool picker.
pub fn tools() -> Vec<(&'static str, &'static str)> {
    TOOLS.iter().map(|t| (t.id, t.title)).collect()
}

/// Looks up a tool by its identifier.
pub fn get_tool(id: &str) -> Result<&'static ToolDefinition> {
    TOOLS
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::UnknownTool(id.to_string()))
}

/// Checks the whole catalog once at startup.
pub fn validate() -> Result<()> {
    TOOLS.iter().try_for_each(validate_tool)
}

/// Checks one definition: unique flags, sane bounds, known choice defaults and
/// overrides that point at real options.
pub fn validate_tool(tool: &ToolDefinition) -> Result<()> {
    let invalid = |msg: String| Error::InvalidCatalog(format!("{}: {}", tool.id, msg));

    if tool.base.is_empty() {
        return Err(invalid("empty base command".to_string()));
    }

    let mut seen = HashSet::new();
    for opt in tool.options() {
        if !seen.insert(opt.flag) {
            return Err(invalid(format!("duplicate flag {}", opt.flag)));
        }
        if let Some(bounds) = opt.bounds {
            if bounds.min > bounds.max {
                return Err(invalid(format!("{} has min > max", opt.flag)));
            }
        }
        if opt.kind == OptionType::Count && opt.bounds.is_none() {
            return Err(invalid(format!("repeat count {} has no bounds", opt.flag)));
        }
        if opt.kind == OptionType::Choice {
            if let DefaultValue::Str(default) = opt.default {
                if !default.is_empty() && !opt.choices.iter().any(|c| c.value == default) {
                    return Err(invalid(format!("{} default {default:?} is not a choice", opt.flag)));
                }
            }
        }
    }

    for (flag, rule) in tool.overrides {
        if tool.option(flag).is_none() {
            return Err(invalid(format!("override for unknown option {flag}")));
        }
        if let Override::ServerModeSelector { suppresses } = rule {
            if let Some((_, missing)) = suppresses.iter().find(|(_, f)| tool.option(f).is_none()) {
                return Err(invalid(format!("selector suppresses unknown option {missing}")));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_valid() {
        validate().unwrap();
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(get_tool("dig").unwrap().title, "DIG (DNS Lookup)");
        assert!(get_tool("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn lists_every_tool_in_order() {
        let ids: Vec<_> = tools().into_iter().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            ["whois", "nslookup", "dig", "nmap", "curl", "whatweb", "subfinder", "wafw00f"]
        );
    }

    #[test]
    fn detects_duplicate_flags() {
        const BROKEN: ToolDefinition = ToolDefinition {
            id: "broken",
            title: "Broken",
            kind: ToolKind::Domain,
            base: &["broken"],
            groups: &[OptionGroup {
                name: "g",
                options: &[
                    OptionSpec::boolean("-a", "a", false),
                    OptionSpec::boolean("-a", "a again", false),
                ],
            }],
            overrides: &[],
        };
        assert!(matches!(validate_tool(&BROKEN), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn detects_unbounded_repeat_count() {
        const BROKEN: ToolDefinition = ToolDefinition {
            id: "broken",
            title: "Broken",
            kind: ToolKind::Domain,
            base: &["broken"],
            groups: &[OptionGroup { name: "g", options: &[OptionSpec::count("-v", "v")] }],
            overrides: &[],
        };
        assert!(matches!(validate_tool(&BROKEN), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn detects_dangling_override() {
        const BROKEN: ToolDefinition = ToolDefinition {
            id: "broken",
            title: "Broken",
            kind: ToolKind::Url,
            base: &["broken"],
            groups: &[],
            overrides: &[("-x", Override::TrailingServer)],
        };
        assert!(validate_tool(&BROKEN).is_err());
    }
}
