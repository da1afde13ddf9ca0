//! 角色档案静态配置表
//!
//! 从真实招聘启事提炼的岗位定义：显示名称、允许的薪酬系数档位、
//! 岗位要求描述。编译期 phf 映射，运行期只读。

use phf::phf_map;

use crate::error::{AppError, AppResult, ConfigError};

/// 角色档案
#[derive(Debug, Clone, Copy)]
pub struct RoleProfile {
    /// 显示名称
    pub name: &'static str,
    /// 该岗位开放的薪酬系数档位
    pub salary_multipliers: &'static [u8],
    /// 岗位要求描述，拼入提示词的"特殊条件"
    pub description: &'static str,
}

/// 角色代码 → 档案
pub static ROLES: phf::Map<&'static str, RoleProfile> = phf_map! {
    "senior_software_engineer" => RoleProfile {
        name: "高级软件开发工程师",
        salary_multipliers: &[3],
        description: "必备要求：精通 .NET 技术栈（C#、.NET Core、ASP.NET Core、ASP.NET MVC），\
熟练使用 ORM 工具（Entity Framework、Dapper），掌握 MSSQL 或 PostgreSQL 及 T-SQL/PL-SQL，\
熟悉 JavaScript 框架（Vue、Angular、React），能够进行数据库设计与性能优化，\
了解 IIS 部署流程，熟练使用 TFS/Git/SVN 等源码管理工具。\n\
优先考虑：企业级软件架构与设计模式、DevOps 与 CI/CD 流程、容器技术（Kubernetes、Docker）、\
Linux/Unix 系统、NoSQL 数据库、ELK 全文检索、分布式缓存（Redis、Memcached）、\
消息队列（RabbitMQ、Kafka）经验。",
    },
    "software_engineer" => RoleProfile {
        name: "软件开发工程师",
        salary_multipliers: &[2],
        description: "必备要求：具备 .NET 技术栈（C#、.NET Core、ASP.NET Core、ASP.NET MVC）基础，\
了解 ORM 工具（Entity Framework、Dapper），掌握 MSSQL 或 PostgreSQL 及 T-SQL 或 PL-SQL，\
能够参与数据库设计与性能优化，熟悉 TFS/Git/SVN 等源码管理工具。\n\
优先考虑：了解 IIS 安装与 Web 应用部署流程。",
    },
    "senior_mobile_engineer" => RoleProfile {
        name: "高级移动端开发工程师",
        salary_multipliers: &[3],
        description: "必备要求：熟悉软件生命周期与安全开发规范，具备 React Native 移动应用开发经验，\
精通 SOAP/REST 架构的 Web 服务与 JSON/XML 数据协议，熟练使用 SoapUI、Postman 等接口测试工具，\
熟悉 TFS/Git/SVN 源码管理。\n\
优先考虑：微服务与 Web 服务技术、JavaScript/CSS3/HTML5、应用商店上架经验、缓存系统知识。",
    },
    "mobile_engineer" => RoleProfile {
        name: "移动端开发工程师",
        salary_multipliers: &[2],
        description: "必备要求：了解软件生命周期与安全开发基础，具备 React Native 移动应用开发经验，\
掌握 SOAP/REST Web 服务与 JSON/XML 协议，会使用 SoapUI/Postman 测试工具，\
具备 TFS/Git/SVN 基础经验。\n\
优先考虑：微服务技术、JavaScript/CSS3/HTML5 基础、应用商店发布经验、缓存基础知识。",
    },
    "senior_database_engineer" => RoleProfile {
        name: "高级数据库工程师（PostgreSQL）",
        salary_multipliers: &[3],
        description: "必备要求：精通 PostgreSQL 数据库体系结构、数据建模与优化/规范化，\
具备 PostgreSQL 集群与高可用方案（Patroni、自动故障转移、复制、灾备、BarMan、PgPool、PgBouncer）经验，\
掌握性能调优与容量规划、存储过程开发、性能监控与日志分析，熟悉 Linux 系统与 Bash/Crontab、LVM 磁盘配置，\
精通 PL/pgSQL 与 TSQL，具备 ETL/OLAP/OLTP 模型开发与 CDC 方案经验。\n\
优先考虑：Elasticsearch、MongoDB、Redis 等 NoSQL 数据库运维经验。",
    },
    "devops_engineer" => RoleProfile {
        name: "DevOps 工程师",
        salary_multipliers: &[3],
        description: "必备要求：精通 Kubernetes、Docker Swarm、Rancher、OpenShift 等容器技术，\
熟悉 Unix/Linux 系统、数据库、应用层与安全知识，熟练使用 Shell、Bash、PowerShell、Python 等脚本语言，\
精通 Git 版本管理，在 GitLab CI、Jenkins、TeamCity、Azure DevOps 等 CI/CD 工具中至少精通一种，\
会使用 Jira/Bitbucket/Bamboo。\n\
优先考虑：CI/CD 工具运维与流水线搭建经验、Prometheus/Grafana/Zabbix 监控、Keycloak 身份管理。",
    },
    "senior_network_engineer" => RoleProfile {
        name: "高级网络工程师",
        salary_multipliers: &[3],
        description: "必备要求：精通 LAN/WAN/WLAN/VPN 与动态路由协议，深入掌握 TCP/IP、DNS、DHCP、802.1x，\
具备无线、负载均衡、防火墙技术与管理经验，了解防病毒/IDS/IPS 与 DDoS 防护，\
能够完成 Cisco/华为/H3C/Juniper 等品牌交换机、路由器、无线控制器配置与 VoIP 部署运维，\
具备网络架构设计与集成、骨干设备管理、PAM 与 NAC 部署运维、网络监控平台运维与报表经验。",
    },
    "network_engineer" => RoleProfile {
        name: "网络工程师",
        salary_multipliers: &[2],
        description: "必备要求：掌握 LAN/WAN/WLAN/VPN 与动态路由协议基础，具备 TCP/IP、DNS、DHCP、802.1x \
中级知识，了解无线、负载均衡、防火墙技术与管理，熟悉防病毒/IDS/IPS 基础与 DDoS 防护概念，\
能够参与网络架构设计与集成、骨干设备基础运维、PAM 与 NAC 部署、网络监控平台运维与报表。",
    },
    "senior_system_engineer" => RoleProfile {
        name: "高级系统工程师",
        salary_multipliers: &[3],
        description: "必备要求：精通 VMware 虚拟化部署与运维，具备存储与 SAN 交换机、备份系统、磁带归档的\
部署配置与运维经验，精通 Microsoft Exchange、Active Directory、DNS、DHCP、文件服务器与 RDP 架构的\
安装配置、集群、升级与故障排查，掌握 Windows 服务器日志分析与性能诊断，熟悉 Windows Server 2016/2019/2022 \
运维、故障转移集群与 Always-On 配置、SAN/NAS 设备管理与系统集成，具备 Linux 服务器安装配置与基础服务运维能力。",
    },
    "system_engineer_windows" => RoleProfile {
        name: "系统工程师（Windows）",
        salary_multipliers: &[2],
        description: "必备要求：熟悉 Microsoft Exchange、Active Directory、DNS、DHCP 的安装配置与管理，\
具备 SCCM 与系统镜像制作分发经验，掌握文件服务器与 RDP 架构配置、集群与故障排查，\
能够进行 Windows 服务器日志分析与性能诊断，熟悉 Windows Server 2016/2019/2022 运维，\
具备良好的 PowerShell 脚本能力，了解服务器硬件（磁盘/网卡/HBA/RAID）、SAN/NAS 存储管理与机房运维基础。",
    },
    "system_engineer_linux" => RoleProfile {
        name: "系统工程师（Linux）",
        salary_multipliers: &[2],
        description: "必备要求：掌握 Linux 系统与服务的安装配置与故障排查，熟悉 LVM/Multipath 磁盘配置，\
能够对 Ubuntu/CentOS/Debian 服务器进行安全加固，了解服务器硬件与 SAN/NAS 存储管理、系统镜像制作分发，\
具备 VMware 虚拟化部署运维经验，熟悉 Debian/RPM 系服务器的安装、加固、监控与性能优化，\
掌握 Shell 脚本、DHCP/DNS/Proxy 服务、企业级备份软硬件运维。\n\
优先考虑：DevOps、容器架构、Kubernetes、Docker 知识。",
    },
    "senior_security_engineer" => RoleProfile {
        name: "高级网络安全工程师",
        salary_multipliers: &[3],
        description: "必备要求：精通 SIEM/SOAR/IDS/IPS/内容过滤/EDR/NDR/WAF/邮件网关/沙箱/漏洞扫描等安全技术，\
具备 PAM/DLP/XDR/UEBA/SSL 检测/代码审计工具/数据库防火墙/蜜罐经验，精通 SOC 运营流程，\
深入掌握 TCP/IP、流量与抓包分析、网络加固，熟悉 ISO 27001 及相关法规标准，\
精通 DHCP/DNS/AD/Exchange/数据库/Web 技术的运行与加固机制，具备安全事件响应、恢复预案管理经验，\
了解安全开发流程，精通应急响应团队建设与运营，熟练使用 Bash/Perl/Python/PowerShell/PHP 编写脚本，\
熟悉暗网情报、MITRE ATT&CK 与 CVE 平台。",
    },
    "business_analyst" => RoleProfile {
        name: "业务分析师",
        salary_multipliers: &[2],
        description: "必备要求：掌握面向对象分析与设计方法，具备流程管理、流程分析、建模与改进经验，\
熟悉测试流程与测试用例的编写执行，掌握业务流程建模的模板/表单/规程，\
会使用 Balsamiq、Visio、SmartDraw、MS Project 等绘图与项目工具，了解政务 Web 服务与系统集成，\
熟练使用 SoapUI、Postman、ThunderClient 等接口测试工具，具备 TFS 或 JIRA 使用经验，\
了解 Web 领域的需求分析与 UX/可用性、敏捷流程与软件项目管理。\n\
优先考虑：具备 SQL 基础。",
    },
};

/// 按代码取角色档案；未知代码是致命的配置错误
pub fn get_role_profile(code: &str) -> AppResult<&'static RoleProfile> {
    ROLES.get(code).ok_or_else(|| {
        AppError::Config(ConfigError::UnknownRole {
            code: code.to_string(),
        })
    })
}

/// 全部可用角色，按代码排序的 (代码, 名称) 列表
pub fn available_roles() -> Vec<(&'static str, &'static str)> {
    let mut roles: Vec<(&'static str, &'static str)> = ROLES
        .entries()
        .map(|(code, profile)| (*code, profile.name))
        .collect();
    roles.sort_by_key(|(code, _)| *code);
    roles
}

/// 校验角色与薪酬系数的组合；不支持的系数同样是致命配置错误
pub fn validate_role(code: &str, coefficient: u8) -> AppResult<&'static RoleProfile> {
    let profile = get_role_profile(code)?;
    if !profile.salary_multipliers.contains(&coefficient) {
        return Err(AppError::Config(ConfigError::UnsupportedCoefficient {
            code: code.to_string(),
            coefficient,
            supported: profile.salary_multipliers.to_vec(),
        }));
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_role_lookup() {
        let profile = get_role_profile("devops_engineer").unwrap();
        assert_eq!(profile.name, "DevOps 工程师");
        assert_eq!(profile.salary_multipliers, &[3]);
    }

    #[test]
    fn test_unknown_role_is_config_error() {
        let err = get_role_profile("no_such_role").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::UnknownRole { .. })
        ));
    }

    #[test]
    fn test_validate_role_rejects_unsupported_coefficient() {
        assert!(validate_role("software_engineer", 2).is_ok());
        let err = validate_role("software_engineer", 4).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::UnsupportedCoefficient { .. })
        ));
    }

    #[test]
    fn test_available_roles_sorted_and_complete() {
        let roles = available_roles();
        assert_eq!(roles.len(), ROLES.len());
        let mut sorted = roles.clone();
        sorted.sort_by_key(|(code, _)| *code);
        assert_eq!(roles, sorted);
    }
}
